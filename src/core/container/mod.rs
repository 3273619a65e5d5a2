//! 길이 접두사 JSON 헤더 + 평탄한 페이로드 컨테이너

pub mod header;
pub mod encoder;
pub mod decoder;

// 테스트 모듈
#[cfg(test)]
mod __tests__;

pub use header::{checksum, Dtype, EntryInfo, Header, Metadata, METADATA_KEY};
pub use decoder::Container;

use std::fmt;

/// 헤더 길이 접두사 크기
pub const N_LEN: usize = std::mem::size_of::<u64>();

/// 컨테이너 크기 통계
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ContainerStats {
    pub entry_count: usize,
    pub lossy_entries: usize,
    /// 입력 바이트 합계
    pub original_bytes: u64,
    /// 페이로드 크기
    pub stored_bytes: u64,
    pub header_bytes: u64,
    /// 길이 접두사 + 헤더 + 페이로드
    pub file_bytes: u64,
}

impl ContainerStats {
    pub(crate) fn from_header(header: &Header, header_len: usize, payload_len: usize) -> Self {
        Self {
            entry_count: header.entries.len(),
            lossy_entries: header.entries.values().filter(|info| info.is_lossy()).count(),
            original_bytes: header
                .entries
                .values()
                .map(|info| info.original_length() as u64)
                .sum(),
            stored_bytes: payload_len as u64,
            header_bytes: header_len as u64,
            file_bytes: (N_LEN + header_len + payload_len) as u64,
        }
    }

    /// 원본 대비 파일 크기 비율 (`original / file`). 1보다 작으면 파일이 더 크다
    pub fn size_ratio(&self) -> f64 {
        if self.file_bytes == 0 {
            return 0.0;
        }
        self.original_bytes as f64 / self.file_bytes as f64
    }
}

impl fmt::Display for ContainerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entries, {} B original, {} B on disk, ratio {:.3}",
            self.entry_count,
            self.original_bytes,
            self.file_bytes,
            self.size_ratio()
        )?;
        if self.lossy_entries > 0 {
            write!(f, ", {} lossy", self.lossy_entries)?;
        }
        Ok(())
    }
}
