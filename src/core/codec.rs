//! 코덱 진입점
//!
//! 설정 검증, 관찰자 주입, 메모리/파일 입출력을 한 곳에 묶는다.

use crate::core::config::CodecConfig;
use crate::core::container::decoder::read_container;
use crate::core::container::encoder::{prepare, write_file};
use crate::core::container::{Container, ContainerStats, Metadata};
use crate::core::error::Result;
use crate::core::law::QuantaLaw;
use crate::core::observer::{CodecObserver, SilentObserver};
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use std::sync::Arc;

/// 컨테이너 인코더/디코더
#[derive(Clone)]
pub struct QuantaCodec {
    config: CodecConfig,
    law: QuantaLaw,
    observer: Arc<dyn CodecObserver>,
}

impl QuantaCodec {
    /// 설정을 검증하고 코덱 생성 (조용한 관찰자)
    pub fn new(config: CodecConfig) -> Result<Self> {
        let law = config.validate()?;
        Ok(Self {
            config,
            law,
            observer: Arc::new(SilentObserver),
        })
    }

    /// 관찰자 교체. 새 관찰자는 곧바로 `law_verified`를 받는다
    pub fn with_observer(mut self, observer: Arc<dyn CodecObserver>) -> Self {
        self.observer = observer;
        self.observer.law_verified(&self.law);
        self
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    pub fn law(&self) -> QuantaLaw {
        self.law
    }

    /// 이름 → 바이트 매핑을 컨테이너 바이트로 직렬화
    pub fn encode<I, K, V>(&self, entries: I, metadata: Option<Metadata>) -> Result<Vec<u8>>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<[u8]>,
    {
        let prepared = prepare(entries, metadata, self.config.storage, &self.law, self.observer.as_ref())?;
        let bytes = prepared.to_bytes()?;
        self.observer.container_written(None, &prepared.stats());
        Ok(bytes)
    }

    /// 임의의 writer로 직렬화
    pub fn encode_to_writer<I, K, V, W>(
        &self,
        entries: I,
        metadata: Option<Metadata>,
        writer: &mut W,
    ) -> Result<ContainerStats>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<[u8]>,
        W: Write,
    {
        let prepared = prepare(entries, metadata, self.config.storage, &self.law, self.observer.as_ref())?;
        prepared.write_to(writer)?;
        let stats = prepared.stats();
        self.observer.container_written(None, &stats);
        Ok(stats)
    }

    /// 파일로 저장 (기존 파일은 덮어씀)
    pub fn save<I, K, V>(
        &self,
        entries: I,
        metadata: Option<Metadata>,
        path: impl AsRef<Path>,
    ) -> Result<ContainerStats>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<[u8]>,
    {
        let path = path.as_ref();
        let prepared = prepare(entries, metadata, self.config.storage, &self.law, self.observer.as_ref())?;
        write_file(path, &prepared, self.config.atomic_writes)?;
        let stats = prepared.stats();
        self.observer.container_written(Some(path), &stats);
        Ok(stats)
    }

    /// 메모리 버퍼에서 디코딩
    pub fn decode(&self, bytes: &[u8]) -> Result<Container> {
        let container = self.read(bytes)?;
        self.observer.container_read(None, &container.stats());
        Ok(container)
    }

    /// 임의의 reader에서 디코딩
    pub fn decode_from_reader<R: Read>(&self, reader: R) -> Result<Container> {
        let container = self.read(reader)?;
        self.observer.container_read(None, &container.stats());
        Ok(container)
    }

    /// 파일에서 디코딩. 파일 핸들은 반환 전에 닫힌다
    pub fn load(&self, path: impl AsRef<Path>) -> Result<Container> {
        let path = path.as_ref();
        let container = {
            let file = File::open(path)?;
            self.read(BufReader::new(file))?
        };
        self.observer.container_read(Some(path), &container.stats());
        Ok(container)
    }

    fn read<R: Read>(&self, reader: R) -> Result<Container> {
        let raw = read_container(reader, self.config.max_header_size)?;
        Container::from_raw(raw, self.config.decode_policy)
    }
}

impl Default for QuantaCodec {
    fn default() -> Self {
        Self {
            config: CodecConfig::default(),
            law: QuantaLaw::milli(),
            observer: Arc::new(SilentObserver),
        }
    }
}

impl std::fmt::Debug for QuantaCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuantaCodec")
            .field("config", &self.config)
            .field("law", &self.law)
            .finish_non_exhaustive()
    }
}

/// 기본 설정(0.001 법칙, 원본 저장)으로 직렬화
pub fn serialize<I, K, V>(entries: I, metadata: Option<Metadata>) -> Result<Vec<u8>>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<[u8]>,
{
    QuantaCodec::default().encode(entries, metadata)
}

/// 기본 설정으로 역직렬화
pub fn deserialize(bytes: &[u8]) -> Result<Container> {
    QuantaCodec::default().decode(bytes)
}

/// 기본 설정으로 파일 저장
pub fn save_file<I, K, V>(
    entries: I,
    metadata: Option<Metadata>,
    path: impl AsRef<Path>,
) -> Result<ContainerStats>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<[u8]>,
{
    QuantaCodec::default().save(entries, metadata, path)
}

/// 기본 설정으로 파일 로드
pub fn load_file(path: impl AsRef<Path>) -> Result<Container> {
    QuantaCodec::default().load(path)
}
