//! 컨테이너 디코더
//!
//! 길이 접두사 → 헤더 → 나머지 페이로드 순서로 읽고, 모든 항목을 검증한 뒤에만
//! 결과를 돌려준다. 부분 결과는 없다.

use super::encoder::PreparedContainer;
use super::header::{Dtype, EntryInfo, Header, Metadata};
use super::{ContainerStats, N_LEN};
use crate::core::error::{QuantaError, Result};
use crate::core::law::{coordinates_from_le_bytes, DecodePolicy};
use byteorder::{LittleEndian, ReadBytesExt};
use std::collections::BTreeMap;
use std::io::{ErrorKind, Read};

/// 검증까지 끝난 헤더와 페이로드
#[derive(Debug)]
pub(crate) struct RawContainer {
    pub header: Header,
    pub header_len: usize,
    pub payload: Vec<u8>,
}

/// 8바이트 헤더 길이 읽기
fn read_header_len<R: Read>(reader: &mut R) -> Result<u64> {
    match reader.read_u64::<LittleEndian>() {
        Ok(n) => Ok(n),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(QuantaError::format(format!(
            "file is too short to hold the {}-byte header length",
            N_LEN
        ))),
        Err(e) => Err(e.into()),
    }
}

pub(crate) fn read_container<R: Read>(mut reader: R, max_header_size: usize) -> Result<RawContainer> {
    let declared = read_header_len(&mut reader)?;
    let header_len = usize::try_from(declared)
        .ok()
        .filter(|&len| len <= max_header_size)
        .ok_or_else(|| {
            QuantaError::format(format!(
                "header length {} exceeds the limit of {} bytes",
                declared, max_header_size
            ))
        })?;

    let mut header_bytes = Vec::new();
    reader
        .by_ref()
        .take(header_len as u64)
        .read_to_end(&mut header_bytes)?;
    if header_bytes.len() < header_len {
        return Err(QuantaError::format(format!(
            "file ends after {} of {} declared header bytes",
            header_bytes.len(),
            header_len
        )));
    }

    let header = Header::parse(&header_bytes)?;

    let mut payload = Vec::new();
    reader.read_to_end(&mut payload)?;
    header.validate(&payload)?;

    Ok(RawContainer {
        header,
        header_len,
        payload,
    })
}

/// 저장 바이트를 원래 바이트로 되돌림. 요약 항목은 요약 그대로
fn materialize(info: &EntryInfo, stored: &[u8], policy: DecodePolicy) -> Result<Vec<u8>> {
    match (info.dtype, info.ratio) {
        (Dtype::U8, _) => Ok(stored.to_vec()),
        (Dtype::F64, None) => {
            let coordinates = coordinates_from_le_bytes(stored)?;
            info.law.decode_coordinates(&coordinates, policy)
        }
        (Dtype::F64, Some(_)) => Err(QuantaError::format("summary entries must be stored as u8")),
    }
}

/// 디코딩된 컨테이너
///
/// 모든 항목은 생성 시점에 복원되어 있다. 손실 요약 항목(`EntryInfo::is_lossy`)은
/// 요약 바이트를 그대로 담고 있으며 원본이 아니다.
#[derive(Debug, Clone)]
pub struct Container {
    header: Header,
    header_len: usize,
    payload: Vec<u8>,
    entries: BTreeMap<String, Vec<u8>>,
}

impl Container {
    pub(crate) fn from_raw(raw: RawContainer, policy: DecodePolicy) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for (name, info) in &raw.header.entries {
            let (start, end) = info.data_offsets;
            let data = materialize(info, &raw.payload[start..end], policy)?;
            entries.insert(name.clone(), data);
        }

        Ok(Self {
            header: raw.header,
            header_len: raw.header_len,
            payload: raw.payload,
            entries,
        })
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// 항목 이름 (이름순, `__metadata__` 제외)
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn info(&self, name: &str) -> Result<&EntryInfo> {
        self.header
            .entries
            .get(name)
            .ok_or_else(|| QuantaError::EntryNotFound(name.to_string()))
    }

    /// 페이로드에 저장된 그대로의 바이트
    pub fn stored(&self, name: &str) -> Result<&[u8]> {
        let (start, end) = self.info(name)?.data_offsets;
        Ok(&self.payload[start..end])
    }

    /// 복원된 항목 바이트
    pub fn entry(&self, name: &str) -> Result<&[u8]> {
        self.entries
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| QuantaError::EntryNotFound(name.to_string()))
    }

    pub fn entries(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.entries
    }

    pub fn into_entries(self) -> BTreeMap<String, Vec<u8>> {
        self.entries
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.header.metadata.as_ref()
    }

    pub fn stats(&self) -> ContainerStats {
        ContainerStats::from_header(&self.header, self.header_len, self.payload.len())
    }

    /// 헤더와 페이로드를 다시 직렬화. 인코더가 만든 파일이면 원본과 바이트 단위로 같다
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        PreparedContainer::from_parts(self.header.clone(), self.payload.clone())?.to_bytes()
    }
}
