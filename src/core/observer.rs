//! 코덱 이벤트 관찰자
//!
//! 라이브러리는 직접 출력하지 않는다. 진행 상황은 주입된 관찰자로만 전달된다.

use crate::core::container::{ContainerStats, EntryInfo};
use crate::core::law::QuantaLaw;
use std::path::Path;

/// 코덱 이벤트 수신자. 모든 메서드는 기본 구현이 비어 있다
pub trait CodecObserver: Send + Sync {
    /// 검증을 마친 법칙 상수를 알림
    ///
    /// 검사는 `QuantaCodec::new`에서 관찰자 없이 끝나므로, 관찰자가
    /// `QuantaCodec::with_observer`로 붙는 시점에 한 번 전달된다.
    fn law_verified(&self, _law: &QuantaLaw) {}

    /// 항목 하나가 페이로드에 추가됨
    fn entry_encoded(&self, _name: &str, _info: &EntryInfo) {}

    /// 컨테이너 직렬화 완료. 파일로 쓴 경우 경로가 함께 전달된다
    fn container_written(&self, _path: Option<&Path>, _stats: &ContainerStats) {}

    /// 컨테이너 역직렬화 및 검증 완료
    fn container_read(&self, _path: Option<&Path>, _stats: &ContainerStats) {}
}

/// 아무것도 하지 않는 기본 관찰자
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentObserver;

impl CodecObserver for SilentObserver {}

/// `log` 파사드로 이벤트를 넘기는 관찰자
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl CodecObserver for LogObserver {
    fn law_verified(&self, law: &QuantaLaw) {
        log::debug!("law {} verified over all 256 byte values", law);
    }

    fn entry_encoded(&self, name: &str, info: &EntryInfo) {
        log::debug!(
            "entry `{}`: dtype={} original={}B stored={}B offsets={:?}{}",
            name,
            info.dtype,
            info.original_length(),
            info.stored_len(),
            info.data_offsets,
            if info.is_lossy() { " (lossy summary)" } else { "" }
        );
    }

    fn container_written(&self, path: Option<&Path>, stats: &ContainerStats) {
        match path {
            Some(path) => log::info!("wrote {} ({})", path.display(), stats),
            None => log::info!("serialized container ({})", stats),
        }
    }

    fn container_read(&self, path: Option<&Path>, stats: &ContainerStats) {
        match path {
            Some(path) => log::info!("read {} ({})", path.display(), stats),
            None => log::info!("deserialized container ({})", stats),
        }
    }
}
