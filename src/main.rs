use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use cnut_reader::{
    parse_encoding, Architecture, BinaryReader, ReaderOptions, DEFAULT_MAX_STRING_LEN,
};
use log::{error, info};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ArchArg {
    #[value(name = "32")]
    X32,
    #[value(name = "64")]
    X64,
}

impl From<ArchArg> for Architecture {
    fn from(arg: ArchArg) -> Self {
        match arg {
            ArchArg::X32 => Architecture::Arch32,
            ArchArg::X64 => Architecture::Arch64,
        }
    }
}

/// Probe a compiled bytecode image: report its architecture and dump string objects.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Path to the compiled image
    path: PathBuf,

    /// Text encoding used to print strings (utf-8, sjis, gbk, ...)
    #[arg(short, long, default_value = "utf-8")]
    encoding: String,

    /// Force the architecture instead of probing for it
    #[arg(short, long, value_enum)]
    arch: Option<ArchArg>,

    /// Offset of the first string object to dump
    #[arg(short, long)]
    offset: Option<u64>,

    /// Number of consecutive string objects to dump from --offset
    #[arg(short, long, default_value_t = 1)]
    strings: usize,

    /// Largest string payload accepted, in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_STRING_LEN)]
    max_string_len: u64,
}

fn run(args: &Args) -> cnut_reader::Result<()> {
    info!("Opening image: {}", args.path.display());
    let mut file = BufReader::new(File::open(&args.path)?);

    let options = ReaderOptions::default()
        .with_max_string_len(args.max_string_len)
        .with_architecture(args.arch.map(Architecture::from).unwrap_or_default());
    let mut reader = BinaryReader::with_options(&mut file, options);

    let arch = reader.detect_architecture()?;
    let size = reader.stream_len()?;

    println!("Image: {}", args.path.display());
    println!("  Size: {} bytes", size);
    println!("  Architecture: {}", arch);

    if let Some(offset) = args.offset {
        let encoding = parse_encoding(&args.encoding);
        reader.seek_to(offset)?;
        println!("\nString objects from offset {:#x} ({}):", offset, encoding.name());
        for i in 0..args.strings {
            let at = reader.position()?;
            let text = reader.read_string_object_text(encoding)?;
            println!("  {}. [{:#x}] {:?}", i + 1, at, text);
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    if let Err(e) = run(&args) {
        error!("{}", e);
        eprintln!("ERROR: Failed to read {}", args.path.display());
        eprintln!("  {}", e);
        std::process::exit(1);
    }
}
