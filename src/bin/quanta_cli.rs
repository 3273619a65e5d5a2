use anyhow::{bail, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use indicatif::{ProgressBar, ProgressStyle};
use quanta_codec::core::law::DEFAULT_SUMMARY_RATIO;
use quanta_codec::{CodecConfig, LogObserver, Metadata, QuantaCodec, QuantaLaw, StorageMode};
use safetensors::SafeTensors;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .short('c')
        .value_name("FILE")
        .help("JSON 설정 파일")
}

fn cli() -> Command {
    Command::new("quanta CLI")
        .version(env!("CARGO_PKG_VERSION"))
        .about("바이트 좌표 변환 컨테이너 도구")
        .subcommand(
            Command::new("pack")
                .about("파일들을 컨테이너 하나로 묶기")
                .arg(Arg::new("output").required(true).help("출력 컨테이너 경로"))
                .arg(
                    Arg::new("inputs")
                        .required(true)
                        .num_args(1..)
                        .help("입력 파일 (.safetensors는 텐서별 항목)"),
                )
                .arg(
                    Arg::new("law")
                        .long("law")
                        .value_name("C")
                        .help("법칙 상수 (기본 0.001)"),
                )
                .arg(
                    Arg::new("mode")
                        .long("mode")
                        .short('m')
                        .value_name("MODE")
                        .value_parser(["raw", "quanta", "summary"])
                        .help("저장 방식 (summary는 손실)"),
                )
                .arg(
                    Arg::new("ratio")
                        .long("ratio")
                        .value_name("N")
                        .help("summary 블록 크기"),
                )
                .arg(config_arg())
                .arg(
                    Arg::new("meta")
                        .long("meta")
                        .value_name("KEY=VALUE")
                        .action(ArgAction::Append)
                        .help("메타데이터 추가"),
                ),
        )
        .subcommand(
            Command::new("unpack")
                .about("컨테이너 항목을 디렉토리에 풀기")
                .arg(Arg::new("container").required(true).help("컨테이너 경로"))
                .arg(Arg::new("dir").required(true).help("출력 디렉토리"))
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("info")
                .about("컨테이너 정보 확인")
                .arg(Arg::new("container").required(true).help("컨테이너 경로"))
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("verify-law")
                .about("법칙 상수 전수 왕복 검사")
                .arg(Arg::new("constant").required(true).help("법칙 상수 C")),
        )
}

fn main() {
    env_logger::init();

    let matches = cli().get_matches();

    let result = match matches.subcommand() {
        Some(("pack", sub_matches)) => handle_pack(sub_matches),
        Some(("unpack", sub_matches)) => handle_unpack(sub_matches),
        Some(("info", sub_matches)) => handle_info(sub_matches),
        Some(("verify-law", sub_matches)) => handle_verify_law(sub_matches),
        _ => {
            println!("❌ 명령을 지정해주세요. --help를 참조하세요.");
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("❌ 오류: {:#}", e);
        process::exit(1);
    }
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a String> {
    matches
        .get_one::<String>(id)
        .with_context(|| format!("missing argument <{}>", id))
}

fn progress_bar(len: usize, prefix: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!("{} [{{elapsed_precise}}] [{{bar:40.green/blue}}] {{pos}}/{{len}} {{msg}}", prefix))?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

/// `--config`가 있으면 파일에서, 없으면 기본 설정
fn load_config(matches: &ArgMatches) -> Result<CodecConfig> {
    match matches.get_one::<String>("config") {
        Some(path) => CodecConfig::from_json_file(path)
            .with_context(|| format!("loading config {}", path)),
        None => Ok(CodecConfig::default()),
    }
}

/// 설정 파일 → 명령행 옵션 순서로 덮어쓰기
fn pack_config(matches: &ArgMatches) -> Result<CodecConfig> {
    let mut config = load_config(matches)?;

    if let Some(law) = matches.get_one::<String>("law") {
        config.law = law.parse().with_context(|| format!("invalid law constant '{}'", law))?;
    }

    let ratio = match matches.get_one::<String>("ratio") {
        Some(ratio) => Some(
            ratio
                .parse::<usize>()
                .with_context(|| format!("invalid ratio '{}'", ratio))?,
        ),
        None => None,
    };

    match matches.get_one::<String>("mode").map(String::as_str) {
        Some("raw") => config.storage = StorageMode::Raw,
        Some("quanta") => config.storage = StorageMode::Quanta,
        Some("summary") => {
            config.storage = StorageMode::Summary {
                ratio: ratio.unwrap_or(DEFAULT_SUMMARY_RATIO),
            }
        }
        Some(other) => bail!("unknown mode '{}'", other),
        None => {
            if let (StorageMode::Summary { .. }, Some(ratio)) = (config.storage, ratio) {
                config.storage = StorageMode::Summary { ratio };
            }
        }
    }

    if ratio.is_some() && !config.storage.is_lossy() {
        bail!("--ratio only applies to summary storage, not {:?}", config.storage);
    }

    Ok(config)
}

fn parse_metadata(matches: &ArgMatches) -> Result<Metadata> {
    let mut metadata = Metadata::new();
    if let Some(pairs) = matches.get_many::<String>("meta") {
        for pair in pairs {
            let (key, value) = pair
                .split_once('=')
                .with_context(|| format!("metadata must be KEY=VALUE, got '{}'", pair))?;
            metadata.insert(key.to_string(), value.to_string());
        }
    }
    metadata.insert("created_at".to_string(), chrono::Utc::now().to_rfc3339());
    Ok(metadata)
}

/// 입력 파일 하나를 항목 목록으로. safetensors는 텐서마다 원본 바이트 항목
fn read_input(path: &Path) -> Result<Vec<(String, Vec<u8>)>> {
    let buffer = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;

    if path.extension().and_then(|e| e.to_str()) == Some("safetensors") {
        let tensors = SafeTensors::deserialize(&buffer)
            .with_context(|| format!("parsing {}", path.display()))?;
        return Ok(tensors
            .tensors()
            .into_iter()
            .map(|(name, view)| (name, view.data().to_vec()))
            .collect());
    }

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .with_context(|| format!("{} has no file name", path.display()))?;
    Ok(vec![(name, buffer)])
}

fn handle_pack(matches: &ArgMatches) -> Result<()> {
    let output = PathBuf::from(required(matches, "output")?);
    let inputs: Vec<PathBuf> = matches
        .get_many::<String>("inputs")
        .context("no input files")?
        .map(PathBuf::from)
        .collect();
    let config = pack_config(matches)?;
    let metadata = parse_metadata(matches)?;

    println!("📦 컨테이너 생성: {:?}", output);
    println!("   법칙 상수: {}", config.law);
    println!("   저장 방식: {:?}", config.storage);
    if config.storage.is_lossy() {
        println!("   ⚠️ summary 방식은 손실 변환이며 원본을 복원할 수 없습니다");
    }

    let codec = QuantaCodec::new(config)?.with_observer(Arc::new(LogObserver));

    let pb = progress_bar(inputs.len(), "📥 읽기:")?;
    let mut entries = Vec::new();
    for input in &inputs {
        pb.set_message(input.display().to_string());
        entries.extend(read_input(input)?);
        pb.inc(1);
    }
    pb.finish_with_message(format!("{}개 항목", entries.len()));

    let stats = codec.save(entries, Some(metadata), &output)?;

    println!("\n✅ 저장 완료: {}", stats);
    Ok(())
}

/// 경로 구분자나 `..` 없는 단순 파일 이름만 허용
fn safe_file_name(name: &str) -> Option<&str> {
    let file_name = Path::new(name).file_name()?.to_str()?;
    (file_name == name && name != "." && name != "..").then_some(name)
}

fn handle_unpack(matches: &ArgMatches) -> Result<()> {
    let container_path = required(matches, "container")?;
    let dir = PathBuf::from(required(matches, "dir")?);

    let codec = QuantaCodec::new(load_config(matches)?)?.with_observer(Arc::new(LogObserver));
    let container = codec.load(container_path)?;

    for name in container.names() {
        if safe_file_name(name).is_none() {
            bail!("entry name '{}' is not a plain file name", name);
        }
    }

    std::fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

    let pb = progress_bar(container.len(), "📤 풀기:")?;
    for (name, data) in container.entries() {
        if container.info(name)?.is_lossy() {
            log::warn!("{} is a lossy summary; writing summary bytes", name);
        }
        pb.set_message(name.clone());
        std::fs::write(dir.join(name), data).with_context(|| format!("writing {}", name))?;
        pb.inc(1);
    }
    pb.finish_with_message("완료");

    println!("✅ {}개 항목 → {:?}", container.len(), dir);
    Ok(())
}

fn handle_info(matches: &ArgMatches) -> Result<()> {
    let container_path = required(matches, "container")?;
    let container = QuantaCodec::new(load_config(matches)?)?.load(container_path)?;

    println!("📋 컨테이너 정보: {}", container_path);

    if let Some(metadata) = container.metadata() {
        println!("\n메타데이터:");
        for (key, value) in metadata {
            println!("  {}: {}", key, value);
        }
    }

    println!("\n항목:");
    for name in container.names() {
        let info = container.info(name)?;
        let (start, end) = info.data_offsets;
        print!(
            "  {}: {} [{}] {}..{} law={}",
            name,
            info.dtype,
            info.original_length(),
            start,
            end,
            info.law
        );
        if let Some(ratio) = info.ratio {
            print!(" ratio={} (lossy)", ratio);
        }
        if let Some(crc) = info.crc16 {
            print!(" crc16={:04x}", crc);
        }
        println!();
    }

    println!("\n{}", container.stats());
    Ok(())
}

fn handle_verify_law(matches: &ArgMatches) -> Result<()> {
    let raw = required(matches, "constant")?;
    let constant: f64 = raw
        .parse()
        .with_context(|| format!("invalid law constant '{}'", raw))?;

    let law = QuantaLaw::new(constant)?;
    println!("✅ 법칙 {}: 256개 바이트 값 모두 왕복", law);
    Ok(())
}
