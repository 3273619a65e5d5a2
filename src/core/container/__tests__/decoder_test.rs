//! 컨테이너 디코더 테스트

use crate::core::codec::QuantaCodec;
use crate::core::config::{CodecConfig, StorageMode};
use crate::core::container::decoder::read_container;
use crate::core::container::encoder::PreparedContainer;
use crate::core::container::{checksum, Container, Dtype, EntryInfo, Header, N_LEN};
use crate::core::error::QuantaError;
use crate::core::law::{coordinates_to_le_bytes, DecodePolicy, QuantaLaw};
use std::collections::BTreeMap;

fn 테스트용_가중치() -> Vec<u8> {
    vec![0, 1, 65, 128, 255]
}

fn 인코딩(config: CodecConfig) -> Vec<u8> {
    QuantaCodec::new(config)
        .unwrap()
        .encode([("weights", 테스트용_가중치()), ("bias", vec![9, 8])], None)
        .unwrap()
}

fn 디코딩(bytes: &[u8]) -> Container {
    QuantaCodec::default().decode(bytes).unwrap()
}

/// 범위를 벗어난 좌표를 담은 (체크섬은 올바른) 파일
fn 범위_밖_좌표_파일() -> Vec<u8> {
    let payload = coordinates_to_le_bytes(&[0.001, 0.3]);
    let mut entries = BTreeMap::new();
    entries.insert(
        "hot".to_string(),
        EntryInfo {
            dtype: Dtype::F64,
            shape: vec![2],
            data_offsets: (0, payload.len()),
            law: QuantaLaw::milli(),
            ratio: None,
            crc16: Some(checksum(&payload)),
        },
    );
    let header = Header { metadata: None, entries };
    PreparedContainer::from_parts(header, payload).unwrap().to_bytes().unwrap()
}

#[test]
fn 빈_입력_거부() {
    let err = read_container(&[0u8; 0][..], 1024).unwrap_err();
    assert!(matches!(err, QuantaError::Format(_)));
}

#[test]
fn 길이_접두사_부족() {
    let err = read_container(&[1u8, 0, 0, 0, 0, 0, 0][..], 1024).unwrap_err();
    assert!(err.to_string().contains("too short"));
}

#[test]
fn 헤더_길이_제한() {
    let mut bytes = 1_000u64.to_le_bytes().to_vec();
    bytes.extend_from_slice(&[b' '; 1_000]);
    let err = read_container(&bytes[..], 999).unwrap_err();
    assert!(err.to_string().contains("exceeds the limit"));

    let bytes = u64::MAX.to_le_bytes();
    assert!(matches!(read_container(&bytes[..], usize::MAX), Err(QuantaError::Format(_))));
}

#[test]
fn 헤더_잘림() {
    let mut bytes = 10u64.to_le_bytes().to_vec();
    bytes.extend_from_slice(b"{}");
    let err = read_container(&bytes[..], 1024).unwrap_err();
    assert!(err.to_string().contains("2 of 10"));
}

#[test]
fn 빈_컨테이너() {
    let mut bytes = 2u64.to_le_bytes().to_vec();
    bytes.extend_from_slice(b"{}");
    let container = 디코딩(&bytes);
    assert!(container.is_empty());
    assert_eq!(container.len(), 0);
    assert!(container.metadata().is_none());
    assert_eq!(container.stats().file_bytes, (N_LEN + 2) as u64);
}

#[test]
fn 원본_항목_복원() {
    let container = 디코딩(&인코딩(CodecConfig::default()));
    assert_eq!(container.names(), vec!["bias", "weights"]);
    assert_eq!(container.entry("weights").unwrap(), 테스트용_가중치().as_slice());
    assert_eq!(container.stored("weights").unwrap(), 테스트용_가중치().as_slice());
    assert_eq!(container.info("weights").unwrap().original_length(), 5);
    assert!(!container.info("weights").unwrap().is_lossy());
}

#[test]
fn 좌표_항목_복원() {
    let bytes = 인코딩(CodecConfig::sub_byte().with_storage(StorageMode::Quanta));
    let container = 디코딩(&bytes);

    let info = container.info("weights").unwrap();
    assert_eq!(info.dtype, Dtype::F64);
    assert_eq!(info.law, QuantaLaw::sub_byte());
    assert_eq!(container.stored("weights").unwrap().len(), 40);
    assert_eq!(container.entry("weights").unwrap(), 테스트용_가중치().as_slice());
}

#[test]
fn 요약_항목은_요약_그대로() {
    let bytes = 인코딩(CodecConfig::default().with_storage(StorageMode::Summary { ratio: 2 }));
    let container = 디코딩(&bytes);

    let info = container.info("weights").unwrap();
    assert!(info.is_lossy());
    assert_eq!(info.ratio, Some(2));
    assert_eq!(info.original_length(), 5);
    assert_eq!(container.entry("weights").unwrap(), &[1, 193, 255]);
    assert_eq!(container.stats().lossy_entries, 2);
}

#[test]
fn 없는_항목_조회() {
    let container = 디코딩(&인코딩(CodecConfig::default()));
    assert!(matches!(container.entry("missing"), Err(QuantaError::EntryNotFound(_))));
    assert!(matches!(container.stored("missing"), Err(QuantaError::EntryNotFound(_))));
    assert!(matches!(container.info("__metadata__"), Err(QuantaError::EntryNotFound(_))));
}

#[test]
fn 엄격_모드는_범위_오류() {
    let err = QuantaCodec::default().decode(&범위_밖_좌표_파일()).unwrap_err();
    assert!(matches!(err, QuantaError::Range { .. }));
}

#[test]
fn 포화_모드는_255로_고정() {
    let codec = QuantaCodec::new(CodecConfig::default().with_decode_policy(DecodePolicy::Clamp)).unwrap();
    let container = codec.decode(&범위_밖_좌표_파일()).unwrap();
    assert_eq!(container.entry("hot").unwrap(), &[1, 255]);
}

#[test]
fn 재직렬화는_같은_바이트() {
    for config in [
        CodecConfig::default(),
        CodecConfig::centi().with_storage(StorageMode::Quanta),
        CodecConfig::default().with_storage(StorageMode::Summary { ratio: 3 }),
    ] {
        let bytes = 인코딩(config);
        assert_eq!(디코딩(&bytes).to_bytes().unwrap(), bytes);
    }
}

#[test]
fn 통계_계산() {
    let bytes = 인코딩(CodecConfig::default().with_storage(StorageMode::Quanta));
    let stats = 디코딩(&bytes).stats();
    assert_eq!(stats.entry_count, 2);
    assert_eq!(stats.original_bytes, 7);
    assert_eq!(stats.stored_bytes, 56);
    assert_eq!(stats.file_bytes, bytes.len() as u64);
    // 좌표 저장은 원본보다 크다
    assert!(stats.size_ratio() < 1.0);
    assert!(stats.to_string().contains("2 entries"));
}
