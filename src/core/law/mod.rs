//! 바이트 ↔ 좌표 스칼라 변환과 손실 블록 요약

pub mod quanta_law;
pub mod summary;

// 테스트 모듈
#[cfg(test)]
mod __tests__;

// 재수출
pub use quanta_law::{
    coordinates_from_le_bytes, coordinates_to_le_bytes, decode, decode_with, encode,
    DecodePolicy, QuantaLaw, CENTI_LAW, COORDINATE_SIZE, MILLI_LAW, SUB_BYTE_LAW,
};
pub use summary::{summarize_blocks, summarized_len, DEFAULT_SUMMARY_RATIO};
