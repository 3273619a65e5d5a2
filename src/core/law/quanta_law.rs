//! 법칙(law) 상수 기반 바이트 ↔ 좌표 변환
//!
//! `quanta = byte * C`, `byte = round(quanta / C)`.
//! 상수 `C`는 생성 시점에 0..=255 전 구간 왕복을 검사한 뒤에만 사용된다.

use crate::core::error::{QuantaError, Result};
use byteorder::{ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 기본 법칙 상수
pub const MILLI_LAW: f64 = 0.001;
pub const CENTI_LAW: f64 = 0.01;
/// 10^-8 법칙
pub const SUB_BYTE_LAW: f64 = 0.000_000_01;

/// 저장된 좌표 하나의 크기 (f64, little-endian)
pub const COORDINATE_SIZE: usize = 8;

/// 범위를 벗어난 좌표 처리 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodePolicy {
    /// 범위 밖이면 `QuantaError::Range`
    #[default]
    Strict,
    /// [0, 255]로 포화. NaN은 여전히 오류
    Clamp,
}

/// 바이트를 좌표로 변환
pub fn encode(byte: u8, constant: f64) -> f64 {
    byte as f64 * constant
}

/// 좌표를 바이트로 복원 (엄격 모드)
pub fn decode(coordinate: f64, constant: f64) -> Result<u8> {
    decode_with(coordinate, constant, DecodePolicy::Strict)
}

/// 지정한 정책으로 좌표를 바이트로 복원
pub fn decode_with(coordinate: f64, constant: f64, policy: DecodePolicy) -> Result<u8> {
    let value = (coordinate / constant).round();
    if value.is_nan() {
        return Err(QuantaError::Range { coordinate, value });
    }

    match policy {
        DecodePolicy::Strict => {
            if (0.0..=255.0).contains(&value) {
                Ok(value as u8)
            } else {
                Err(QuantaError::Range { coordinate, value })
            }
        }
        DecodePolicy::Clamp => Ok(value.clamp(0.0, 255.0) as u8),
    }
}

/// 검증된 법칙 상수
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct QuantaLaw {
    constant: f64,
}

impl QuantaLaw {
    /// 상수를 검사하고 법칙 생성
    ///
    /// 유한한 양수여야 하며, 모든 바이트 값이 `decode(encode(b)) == b`를
    /// 만족해야 한다.
    pub fn new(constant: f64) -> Result<Self> {
        if !constant.is_finite() {
            return Err(QuantaError::InvalidLaw {
                constant,
                reason: "must be finite".to_string(),
            });
        }
        if constant <= 0.0 {
            return Err(QuantaError::InvalidLaw {
                constant,
                reason: "must be positive".to_string(),
            });
        }

        let law = Self { constant };
        law.verify()?;
        Ok(law)
    }

    /// 0.001
    pub const fn milli() -> Self {
        Self { constant: MILLI_LAW }
    }

    /// 0.01
    pub const fn centi() -> Self {
        Self { constant: CENTI_LAW }
    }

    /// 10^-8
    pub const fn sub_byte() -> Self {
        Self { constant: SUB_BYTE_LAW }
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// 256개 바이트 값 전체 왕복 검사. 실패한 첫 바이트를 보고
    pub fn verify(&self) -> Result<()> {
        for byte in 0..=u8::MAX {
            let coordinate = encode(byte, self.constant);
            match decode(coordinate, self.constant) {
                Ok(restored) if restored == byte => {}
                Ok(restored) => {
                    return Err(QuantaError::InvalidLaw {
                        constant: self.constant,
                        reason: format!("byte {} decodes back to {}", byte, restored),
                    })
                }
                Err(e) => {
                    return Err(QuantaError::InvalidLaw {
                        constant: self.constant,
                        reason: format!("byte {} does not round-trip: {}", byte, e),
                    })
                }
            }
        }
        Ok(())
    }

    pub fn encode(&self, byte: u8) -> f64 {
        encode(byte, self.constant)
    }

    pub fn decode(&self, coordinate: f64) -> Result<u8> {
        decode(coordinate, self.constant)
    }

    pub fn decode_with(&self, coordinate: f64, policy: DecodePolicy) -> Result<u8> {
        decode_with(coordinate, self.constant, policy)
    }

    /// 바이트 시퀀스 전체를 좌표로 변환
    pub fn encode_bytes(&self, data: &[u8]) -> Vec<f64> {
        data.iter().map(|&b| self.encode(b)).collect()
    }

    /// 좌표 시퀀스 전체 복원. 하나라도 실패하면 전체 실패
    pub fn decode_coordinates(&self, coordinates: &[f64], policy: DecodePolicy) -> Result<Vec<u8>> {
        coordinates
            .iter()
            .map(|&c| self.decode_with(c, policy))
            .collect()
    }
}

impl Default for QuantaLaw {
    fn default() -> Self {
        Self::milli()
    }
}

impl TryFrom<f64> for QuantaLaw {
    type Error = QuantaError;

    fn try_from(constant: f64) -> Result<Self> {
        Self::new(constant)
    }
}

impl From<QuantaLaw> for f64 {
    fn from(law: QuantaLaw) -> f64 {
        law.constant
    }
}

impl fmt::Display for QuantaLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.constant)
    }
}

/// 좌표를 little-endian f64 바이트열로 직렬화
pub fn coordinates_to_le_bytes(coordinates: &[f64]) -> Vec<u8> {
    let mut buffer = vec![0u8; coordinates.len() * COORDINATE_SIZE];
    LittleEndian::write_f64_into(coordinates, &mut buffer);
    buffer
}

/// little-endian f64 바이트열에서 좌표 복원
pub fn coordinates_from_le_bytes(bytes: &[u8]) -> Result<Vec<f64>> {
    if bytes.len() % COORDINATE_SIZE != 0 {
        return Err(QuantaError::format(format!(
            "coordinate buffer of {} bytes is not a multiple of {}",
            bytes.len(),
            COORDINATE_SIZE
        )));
    }

    let mut coordinates = vec![0.0f64; bytes.len() / COORDINATE_SIZE];
    LittleEndian::read_f64_into(bytes, &mut coordinates);
    Ok(coordinates)
}
