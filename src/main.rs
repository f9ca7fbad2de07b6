use clap::{Parser, Subcommand};
use scavenger::decoder::Decoder;
use scavenger::encoder::Encoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Write};
use std::path::PathBuf;

/// Transfer chunk size used by every CLI data path — never hold a whole
/// object in memory. Matches the encoder/decoder's own internal chunking.
const CLI_CHUNK_SIZE: usize = 16 * 1024;

#[derive(Parser)]
#[command(name = "scavenger", version = "1.0.0", about = "The Scavenger archive container CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print primary/secondary signatures and object count
    Stat { input: PathBuf },
    /// Extract one object byte-for-byte
    Get {
        input: PathBuf,
        index: u64,
        out: PathBuf,
    },
    /// Build an archive from a list of files, one path per line
    Build {
        output: PathBuf,
        primary: String,
        secondary: String,
        list: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        // ── Stat ─────────────────────────────────────────────────────────
        Commands::Stat { input } => {
            let decoder = Decoder::open(&input)?;
            println!("primary:   {}", decoder.primary());
            print!("secondary: {}", decoder.secondary());
            if let Some(ascii) = decoder.secondary_ascii() {
                print!("  (ascii: {ascii:?})");
            }
            println!();
            println!("count:     {}", decoder.count());
        }

        // ── Get ──────────────────────────────────────────────────────────
        Commands::Get { input, index, out } => {
            let mut decoder = Decoder::open(&input)?;
            let mut out_file = File::create(&out)?;
            decoder.copy_object_to(index, &mut out_file)?;
            out_file.flush()?;
        }

        // ── Build ────────────────────────────────────────────────────────
        Commands::Build { output, primary, secondary, list } => {
            let paths = read_path_list(&list)?;
            let mut encoder = Encoder::new(&output, &primary, &secondary)?;

            for path in &paths {
                encoder.begin_object()?;
                stream_file_into(&mut encoder, path)?;
            }
            encoder.complete()?;
            println!("Built {} object(s) -> {}", paths.len(), output.display());
        }
    }

    Ok(())
}

/// Parse a one-path-per-line list file: blank lines are ignored, a leading
/// UTF-8 BOM on the first line is stripped, and trailing whitespace on every
/// line is trimmed.
fn read_path_list(path: &PathBuf) -> std::io::Result<Vec<PathBuf>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut out = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        let mut line = line?;
        if i == 0 {
            if let Some(stripped) = line.strip_prefix('\u{feff}') {
                line = stripped.to_owned();
            }
        }
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            continue;
        }
        out.push(PathBuf::from(trimmed));
    }
    Ok(out)
}

fn stream_file_into(encoder: &mut Encoder, path: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mut file = File::open(path)?;
    let mut buf = [0u8; CLI_CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        encoder.write(&buf[..n])?;
    }
    Ok(())
}
