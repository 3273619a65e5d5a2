//! 법칙 변환 테스트

use crate::core::error::QuantaError;
use crate::core::law::*;
use approx::assert_relative_eq;

#[test]
fn 전체_바이트_왕복_테스트() {
    for law in [QuantaLaw::milli(), QuantaLaw::centi(), QuantaLaw::sub_byte()] {
        for byte in 0..=u8::MAX {
            let coordinate = law.encode(byte);
            assert_eq!(law.decode(coordinate).unwrap(), byte, "law {} byte {}", law, byte);
        }
    }
}

#[test]
fn 프리셋_법칙_검증_통과() {
    assert!(QuantaLaw::milli().verify().is_ok());
    assert!(QuantaLaw::centi().verify().is_ok());
    assert!(QuantaLaw::sub_byte().verify().is_ok());
    assert_eq!(QuantaLaw::new(MILLI_LAW).unwrap(), QuantaLaw::milli());
}

#[test]
fn 좌표_값_테스트() {
    assert_relative_eq!(encode(65, 0.001), 0.065, epsilon = 1e-12);
    assert_relative_eq!(encode(255, 0.01), 2.55, epsilon = 1e-12);
    assert_eq!(encode(0, SUB_BYTE_LAW), 0.0);
}

#[test]
fn 반올림_복원_테스트() {
    assert_eq!(decode(0.0654, 0.001).unwrap(), 65);
    assert_eq!(decode(0.0656, 0.001).unwrap(), 66);
}

#[test]
fn 잘못된_상수_거부() {
    for constant in [0.0, -0.001, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = QuantaLaw::new(constant).unwrap_err();
        assert!(matches!(err, QuantaError::InvalidLaw { .. }), "constant {}", constant);
    }
}

#[test]
fn 왕복_실패_상수_거부() {
    // 255 * C 가 무한대로 넘치는 상수
    for constant in [f64::MAX, 1e307] {
        let err = QuantaLaw::new(constant).unwrap_err();
        match err {
            QuantaError::InvalidLaw { reason, .. } => assert!(reason.contains("byte")),
            other => panic!("unexpected error: {other}"),
        }
    }
}

#[test]
fn 엄격_모드_범위_오류() {
    let law = QuantaLaw::milli();
    assert!(matches!(law.decode(0.3), Err(QuantaError::Range { .. })));
    assert!(matches!(law.decode(-0.002), Err(QuantaError::Range { .. })));
    assert!(matches!(law.decode(f64::INFINITY), Err(QuantaError::Range { .. })));
}

#[test]
fn 포화_모드_테스트() {
    let law = QuantaLaw::milli();
    assert_eq!(law.decode_with(0.3, DecodePolicy::Clamp).unwrap(), 255);
    assert_eq!(law.decode_with(-0.002, DecodePolicy::Clamp).unwrap(), 0);
    assert_eq!(law.decode_with(0.128, DecodePolicy::Clamp).unwrap(), 128);
    // NaN은 포화해도 의미가 없음
    assert!(law.decode_with(f64::NAN, DecodePolicy::Clamp).is_err());
}

#[test]
fn 시퀀스_변환_테스트() {
    let law = QuantaLaw::centi();
    let data = vec![0u8, 1, 65, 128, 255];
    let coordinates = law.encode_bytes(&data);
    assert_eq!(coordinates.len(), data.len());

    let restored = law.decode_coordinates(&coordinates, DecodePolicy::Strict).unwrap();
    assert_eq!(restored, data);
}

#[test]
fn 시퀀스_중_하나라도_실패하면_전체_실패() {
    let law = QuantaLaw::milli();
    let coordinates = [0.001, 0.002, 9.0];
    assert!(law.decode_coordinates(&coordinates, DecodePolicy::Strict).is_err());
}

#[test]
fn 좌표_바이트열_변환_테스트() {
    let law = QuantaLaw::sub_byte();
    let coordinates = law.encode_bytes(&[7, 200, 255]);
    let bytes = coordinates_to_le_bytes(&coordinates);
    assert_eq!(bytes.len(), 3 * COORDINATE_SIZE);
    assert_eq!(&bytes[..8], &coordinates[0].to_le_bytes());

    let restored = coordinates_from_le_bytes(&bytes).unwrap();
    assert_eq!(restored, coordinates);
}

#[test]
fn 좌표_바이트열_길이_오류() {
    let err = coordinates_from_le_bytes(&[0u8; 12]).unwrap_err();
    assert!(matches!(err, QuantaError::Format(_)));
    assert!(coordinates_from_le_bytes(&[]).unwrap().is_empty());
}

#[test]
fn 직렬화는_상수_하나() {
    let json = serde_json::to_string(&QuantaLaw::milli()).unwrap();
    assert_eq!(json, "0.001");

    let law: QuantaLaw = serde_json::from_str("0.01").unwrap();
    assert_eq!(law, QuantaLaw::centi());

    assert!(serde_json::from_str::<QuantaLaw>("-1.0").is_err());
}
