//! 컨테이너 인코더
//!
//! `[헤더 길이: u64 LE][헤더: JSON][페이로드]` 순서로 한 번에 기록한다.

use super::header::{checksum, Dtype, EntryInfo, Header, Metadata, METADATA_KEY};
use super::ContainerStats;
use crate::core::config::StorageMode;
use crate::core::error::{QuantaError, Result};
use crate::core::law::{coordinates_to_le_bytes, summarize_blocks, QuantaLaw};
use crate::core::observer::CodecObserver;
use byteorder::{LittleEndian, WriteBytesExt};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// 직렬화 직전의 헤더와 페이로드
#[derive(Debug)]
pub(crate) struct PreparedContainer {
    pub header: Header,
    pub header_bytes: Vec<u8>,
    pub payload: Vec<u8>,
}

impl PreparedContainer {
    pub fn from_parts(header: Header, payload: Vec<u8>) -> Result<Self> {
        let header_bytes = header.to_json_bytes()?;
        Ok(Self {
            header,
            header_bytes,
            payload,
        })
    }

    pub fn stats(&self) -> ContainerStats {
        ContainerStats::from_header(&self.header, self.header_bytes.len(), self.payload.len())
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u64::<LittleEndian>(self.header_bytes.len() as u64)?;
        writer.write_all(&self.header_bytes)?;
        writer.write_all(&self.payload)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer =
            Vec::with_capacity(super::N_LEN + self.header_bytes.len() + self.payload.len());
        self.write_to(&mut buffer)?;
        Ok(buffer)
    }
}

/// 저장 방식에 따라 실제로 기록할 바이트 생성
pub(crate) fn stored_bytes(
    data: &[u8],
    storage: StorageMode,
    law: &QuantaLaw,
) -> Result<(Dtype, Option<usize>, Vec<u8>)> {
    match storage {
        StorageMode::Raw => Ok((Dtype::U8, None, data.to_vec())),
        StorageMode::Quanta => {
            let coordinates = law.encode_bytes(data);
            Ok((Dtype::F64, None, coordinates_to_le_bytes(&coordinates)))
        }
        StorageMode::Summary { ratio } => {
            Ok((Dtype::U8, Some(ratio), summarize_blocks(data, ratio)?))
        }
    }
}

/// 이름순으로 항목을 페이로드에 이어 붙이고 헤더 구성
pub(crate) fn prepare<I, K, V>(
    entries: I,
    metadata: Option<Metadata>,
    storage: StorageMode,
    law: &QuantaLaw,
    observer: &dyn CodecObserver,
) -> Result<PreparedContainer>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<[u8]>,
{
    let mut sorted: BTreeMap<String, V> = BTreeMap::new();
    for (name, data) in entries {
        let name = name.as_ref();
        if name == METADATA_KEY {
            return Err(QuantaError::ReservedName(name.to_string()));
        }
        if sorted.insert(name.to_string(), data).is_some() {
            return Err(QuantaError::DuplicateEntry(name.to_string()));
        }
    }

    let mut header = Header {
        metadata,
        entries: BTreeMap::new(),
    };
    let mut payload = Vec::new();

    for (name, data) in sorted {
        let data = data.as_ref();
        let (dtype, ratio, stored) = stored_bytes(data, storage, law)?;

        let start = payload.len();
        payload.extend_from_slice(&stored);
        let end = payload.len();

        let info = EntryInfo {
            dtype,
            shape: vec![data.len()],
            data_offsets: (start, end),
            law: *law,
            ratio,
            crc16: Some(checksum(&stored)),
        };
        observer.entry_encoded(&name, &info);
        header.entries.insert(name, info);
    }

    PreparedContainer::from_parts(header, payload)
}

/// 컨테이너를 파일로 기록
///
/// `atomic`이면 같은 디렉터리의 임시 파일에 쓴 뒤 rename 하므로
/// 중단되어도 이전 파일 또는 새 파일만 남는다. 아니면 중단 시 잘린 파일이
/// 남을 수 있고, 디코더는 이를 포맷 오류로 거부한다.
pub(crate) fn write_file(path: &Path, prepared: &PreparedContainer, atomic: bool) -> Result<()> {
    if atomic {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(parent)?;
        {
            let mut writer = BufWriter::new(temp.as_file_mut());
            prepared.write_to(&mut writer)?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| e.error)?;
    } else {
        let mut writer = BufWriter::new(File::create(path)?);
        prepared.write_to(&mut writer)?;
        writer.flush()?;
    }
    Ok(())
}
