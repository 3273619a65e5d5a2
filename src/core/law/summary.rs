//! 손실 블록 요약
//!
//! 입력을 `ratio` 바이트 블록으로 나누고 블록마다 `(합 mod 256)` 한 바이트만
//! 남긴다. `round(sum * C / C) % 256`과 같은 값이며 원본 복원은 불가능하다.

use crate::core::error::{QuantaError, Result};

/// 100,000,000 바이트 블록당 1바이트
pub const DEFAULT_SUMMARY_RATIO: usize = 100_000_000;

/// 요약 결과 길이 `ceil(len / ratio)`
pub fn summarized_len(len: usize, ratio: usize) -> Result<usize> {
    if ratio == 0 {
        return Err(QuantaError::InvalidConfig("summary ratio must be at least 1".to_string()));
    }
    Ok(len.div_ceil(ratio))
}

/// 블록 단위 합계 요약 (비가역)
pub fn summarize_blocks(data: &[u8], ratio: usize) -> Result<Vec<u8>> {
    if ratio == 0 {
        return Err(QuantaError::InvalidConfig("summary ratio must be at least 1".to_string()));
    }

    Ok(data
        .chunks(ratio)
        .map(|block| {
            let sum: u64 = block.iter().map(|&b| b as u64).sum();
            (sum % 256) as u8
        })
        .collect())
}
