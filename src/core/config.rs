//! 코덱 설정
//!
//! 법칙 상수는 모듈 상수가 아니라 설정값이며, 항목마다 헤더에 기록된다.

use crate::core::error::{QuantaError, Result};
use crate::core::law::{DecodePolicy, QuantaLaw, CENTI_LAW, MILLI_LAW, SUB_BYTE_LAW};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 헤더 최대 크기 (100MB)
pub const MAX_HEADER_SIZE: usize = 100_000_000;

/// 항목 저장 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// 원본 바이트 그대로 (`u8`)
    #[default]
    Raw,
    /// 바이트마다 f64 좌표 (`f64`, 무손실, 8배 확장)
    Quanta,
    /// 블록 합계 요약 (`u8` + `ratio`, 손실)
    Summary { ratio: usize },
}

impl StorageMode {
    pub fn is_lossy(&self) -> bool {
        matches!(self, StorageMode::Summary { .. })
    }
}

/// 코덱 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// 법칙 상수 `C`
    pub law: f64,
    /// 저장 방식
    pub storage: StorageMode,
    /// 좌표 복원 정책
    pub decode_policy: DecodePolicy,
    /// 허용하는 헤더 최대 길이
    pub max_header_size: usize,
    /// 임시 파일에 쓴 뒤 rename
    pub atomic_writes: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            law: MILLI_LAW,
            storage: StorageMode::Raw,
            decode_policy: DecodePolicy::Strict,
            max_header_size: MAX_HEADER_SIZE,
            atomic_writes: true,
        }
    }
}

impl CodecConfig {
    /// 0.001 법칙
    pub fn milli() -> Self {
        Self::default()
    }

    /// 0.01 법칙
    pub fn centi() -> Self {
        Self {
            law: CENTI_LAW,
            ..Default::default()
        }
    }

    /// 10^-8 법칙
    pub fn sub_byte() -> Self {
        Self {
            law: SUB_BYTE_LAW,
            ..Default::default()
        }
    }

    pub fn with_storage(mut self, storage: StorageMode) -> Self {
        self.storage = storage;
        self
    }

    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }

    /// JSON 설정 파일 로드
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content).map_err(|e| {
            QuantaError::InvalidConfig(format!("{}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// 법칙 상수와 저장 방식 검사. 검증된 법칙을 돌려준다
    pub fn validate(&self) -> Result<QuantaLaw> {
        if let StorageMode::Summary { ratio } = self.storage {
            if ratio == 0 {
                return Err(QuantaError::InvalidConfig(
                    "summary ratio must be at least 1".to_string(),
                ));
            }
        }
        if self.max_header_size == 0 {
            return Err(QuantaError::InvalidConfig(
                "max_header_size must be positive".to_string(),
            ));
        }
        QuantaLaw::new(self.law)
    }
}
