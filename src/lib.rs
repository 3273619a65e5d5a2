//! 바이트 ↔ 좌표 스칼라 변환과 길이 접두사 컨테이너 포맷
//!
//! 각 바이트를 `quanta = byte * C` 좌표로 옮기고 `round(quanta / C)`로 되돌린다.
//! 이름 붙은 바이트 시퀀스는 `[u64 LE 헤더 길이][JSON 헤더][페이로드]` 파일에 저장된다.
//!
//! 좌표 저장(`StorageMode::Quanta`)은 무손실이지만 바이트당 8바이트로 커지고,
//! 블록 요약(`StorageMode::Summary`)은 원본을 복원할 수 없는 손실 모드다.

pub mod core;

// 핵심 모듈들 재수출
pub use crate::core::{
    // 변환
    DecodePolicy, QuantaLaw,
    // 컨테이너
    Container, ContainerStats, Dtype, EntryInfo, Header, Metadata,
    // 설정, 오류, 관찰자
    CodecConfig, StorageMode, QuantaError, Result,
    CodecObserver, LogObserver, SilentObserver,
    // 진입점
    QuantaCodec, serialize, deserialize, save_file, load_file,
};
