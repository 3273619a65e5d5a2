//! 컨테이너 헤더 모델
//!
//! 헤더는 UTF-8 JSON 객체다. 항목 이름마다 `EntryInfo` 하나,
//! 선택적으로 `__metadata__` 키에 문자열 쌍이 들어간다.

use crate::core::error::{QuantaError, Result};
use crate::core::law::{summarized_len, QuantaLaw, COORDINATE_SIZE};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 자유 형식 메타데이터
pub type Metadata = BTreeMap<String, String>;

/// 메타데이터 예약 키
pub const METADATA_KEY: &str = "__metadata__";

/// 저장 요소 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    /// 바이트 그대로 (원본 또는 손실 요약)
    U8,
    /// little-endian f64 좌표
    F64,
}

impl Dtype {
    /// 요소 하나의 바이트 크기
    pub fn size(&self) -> usize {
        match self {
            Dtype::U8 => 1,
            Dtype::F64 => COORDINATE_SIZE,
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dtype::U8 => write!(f, "u8"),
            Dtype::F64 => write!(f, "f64"),
        }
    }
}

/// 항목 하나의 헤더 정보
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryInfo {
    pub dtype: Dtype,
    /// `[원본 길이]`
    pub shape: Vec<usize>,
    /// 페이로드 내 `[start, end)`
    pub data_offsets: (usize, usize),
    /// 이 항목에 쓰인 법칙 상수
    pub law: QuantaLaw,
    /// 손실 요약 항목의 블록 크기
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<usize>,
    /// 저장 바이트의 CRC-16/XMODEM
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crc16: Option<u16>,
}

impl EntryInfo {
    /// 원본 바이트 길이
    pub fn original_length(&self) -> usize {
        self.shape.first().copied().unwrap_or(0)
    }

    /// 페이로드에 실제로 저장된 길이
    pub fn stored_len(&self) -> usize {
        self.data_offsets.1.saturating_sub(self.data_offsets.0)
    }

    /// 블록 요약 항목이면 원본 복원이 불가능하다
    pub fn is_lossy(&self) -> bool {
        self.ratio.is_some()
    }

    /// dtype/ratio/원본 길이로부터 기대되는 저장 길이
    pub fn expected_stored_len(&self) -> Result<usize> {
        let len = self.original_length();
        match (self.dtype, self.ratio) {
            (dtype, None) => len
                .checked_mul(dtype.size())
                .ok_or_else(|| QuantaError::format(format!("original length {} overflows", len))),
            (Dtype::U8, Some(ratio)) => summarized_len(len, ratio)
                .map_err(|e| QuantaError::format(e.to_string())),
            (Dtype::F64, Some(_)) => Err(QuantaError::format(
                "summary entries must be stored as u8",
            )),
        }
    }
}

/// 컨테이너 헤더 전체
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Header {
    #[serde(rename = "__metadata__", default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(flatten)]
    pub entries: BTreeMap<String, EntryInfo>,
}

impl Header {
    /// JSON 바이트로 직렬화. 같은 헤더는 항상 같은 바이트가 된다
    pub fn to_json_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| QuantaError::format(format!("header serialization failed: {}", e)))
    }

    /// 헤더 바이트 파싱
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        if !text.starts_with('{') {
            return Err(QuantaError::format("header must be a JSON object starting with `{`"));
        }
        Ok(serde_json::from_str(text)?)
    }

    /// 오프셋, 저장 길이, 체크섬을 페이로드 기준으로 검사
    ///
    /// 항목 구간은 0부터 페이로드 끝까지 빈틈 없이 이어져야 한다.
    pub fn validate(&self, payload: &[u8]) -> Result<()> {
        let mut ordered: Vec<(&String, &EntryInfo)> = self.entries.iter().collect();
        ordered.sort_by_key(|(_, info)| info.data_offsets);

        let mut cursor = 0usize;
        for (name, info) in ordered {
            if info.shape.len() != 1 {
                return Err(QuantaError::format(format!(
                    "entry `{}` must have a one-dimensional shape, got {:?}",
                    name, info.shape
                )));
            }

            let (start, end) = info.data_offsets;
            if start > end {
                return Err(QuantaError::format(format!(
                    "entry `{}` has inverted offsets [{}, {})",
                    name, start, end
                )));
            }
            if end > payload.len() {
                return Err(QuantaError::format(format!(
                    "entry `{}` offsets [{}, {}) exceed payload of {} bytes",
                    name,
                    start,
                    end,
                    payload.len()
                )));
            }
            if start != cursor {
                return Err(QuantaError::format(format!(
                    "entry `{}` starts at {} but previous data ends at {}",
                    name, start, cursor
                )));
            }

            let expected = info.expected_stored_len()?;
            if end - start != expected {
                return Err(QuantaError::format(format!(
                    "entry `{}` stores {} bytes, expected {} for dtype {}",
                    name,
                    end - start,
                    expected,
                    info.dtype
                )));
            }

            if let Some(expected_crc) = info.crc16 {
                let actual_crc = checksum(&payload[start..end]);
                if actual_crc != expected_crc {
                    return Err(QuantaError::format(format!(
                        "entry `{}` checksum mismatch: expected 0x{:04X}, got 0x{:04X}",
                        name, expected_crc, actual_crc
                    )));
                }
            }

            cursor = end;
        }

        if cursor != payload.len() {
            return Err(QuantaError::format(format!(
                "payload has {} trailing bytes not covered by any entry",
                payload.len() - cursor
            )));
        }
        Ok(())
    }
}

/// 저장 바이트 체크섬
pub fn checksum(data: &[u8]) -> u16 {
    crc16::State::<crc16::XMODEM>::calculate(data)
}
