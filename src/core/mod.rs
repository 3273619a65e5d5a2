//! # 코덱 핵심 모듈
//!
//! 법칙 변환, 컨테이너 포맷, 설정, 관찰자

pub mod error;
pub mod config;
pub mod law;
pub mod container;
pub mod observer;
pub mod codec;

// 주요 타입들 재수출
pub use error::{QuantaError, Result};
pub use config::{CodecConfig, StorageMode, MAX_HEADER_SIZE};
pub use law::{DecodePolicy, QuantaLaw};
pub use container::{Container, ContainerStats, Dtype, EntryInfo, Header, Metadata};
pub use observer::{CodecObserver, LogObserver, SilentObserver};
pub use codec::{deserialize, load_file, save_file, serialize, QuantaCodec};
