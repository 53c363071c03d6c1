//! Sandboxed side of secure downloads.
//!
//! Reads a dataset body from stdin and writes it to `<dir>/<filename from url>`.
//! Run inside the sandbox by `geoharvest` so that only this process touches
//! the download directory.

use std::io::Read;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use geoharvest::crawler::write_bytes;

#[derive(Parser, Debug)]
#[command(author, version, about = "Write a downloaded dataset from stdin", long_about = None)]
struct WriterArgs {
    /// URL the dataset was downloaded from
    #[arg(long)]
    url: String,

    /// Directory to write into
    #[arg(long)]
    dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = WriterArgs::parse();

    let mut bytes = Vec::new();
    std::io::stdin()
        .lock()
        .read_to_end(&mut bytes)
        .context("Failed to read dataset from stdin")?;

    let path = write_bytes(&args.dir, &args.url, &bytes)
        .with_context(|| format!("Failed to write {} into {}", args.url, args.dir.display()))?;
    eprintln!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
