//! 코덱 전역 오류 타입

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuantaError {
    /// 파일 구조가 깨졌거나 헤더/오프셋이 잘못됨
    #[error("format error: {0}")]
    Format(String),

    /// 좌표를 되돌린 값이 바이트 범위를 벗어남
    #[error("coordinate {coordinate} decodes to {value}, outside the byte range [0, 255]")]
    Range { coordinate: f64, value: f64 },

    #[error("invalid law constant {constant}: {reason}")]
    InvalidLaw { constant: f64, reason: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("entry `{0}` not found")]
    EntryNotFound(String),

    #[error("entry name `{0}` is reserved")]
    ReservedName(String),

    #[error("duplicate entry name `{0}`")]
    DuplicateEntry(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, QuantaError>;

impl QuantaError {
    pub(crate) fn format(message: impl Into<String>) -> Self {
        QuantaError::Format(message.into())
    }
}

impl From<serde_json::Error> for QuantaError {
    fn from(e: serde_json::Error) -> Self {
        QuantaError::Format(format!("invalid header JSON: {}", e))
    }
}

impl From<std::str::Utf8Error> for QuantaError {
    fn from(e: std::str::Utf8Error) -> Self {
        QuantaError::Format(format!("header is not valid UTF-8: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn 오류_메시지_테스트() {
        let err = QuantaError::format("header too small");
        assert!(err.to_string().contains("format error"));

        let err = QuantaError::Range { coordinate: 0.3, value: 300.0 };
        assert!(err.to_string().contains("outside the byte range"));

        let err = QuantaError::InvalidLaw { constant: 0.0, reason: "must be positive".to_string() };
        assert!(err.to_string().contains("invalid law constant 0"));

        let err = QuantaError::EntryNotFound("weights".to_string());
        assert!(err.to_string().contains("`weights` not found"));

        let err = QuantaError::DuplicateEntry("bias".to_string());
        assert!(err.to_string().contains("duplicate entry name"));
    }

    #[test]
    fn json_오류는_포맷_오류로_변환() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: QuantaError = json_err.into();
        assert!(matches!(err, QuantaError::Format(_)));
    }

    #[test]
    fn io_오류는_그대로_전달() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: QuantaError = io_err.into();
        match err {
            QuantaError::Io(inner) => assert_eq!(inner.kind(), std::io::ErrorKind::PermissionDenied),
            other => panic!("unexpected error: {other}"),
        }
    }
}
