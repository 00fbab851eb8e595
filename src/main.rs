//! Main entry point for the archash CLI application.
//!
//! Prints `<size>\t<hash>` for a local file, or `<size>\t<crc sum>` for a
//! remote ZIP read through HTTP Range requests.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;

use archash::{Cli, HttpRangeReader, ZipCrcs, init_tracing, size_and_hash, zip_crcs_from_stream};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level(), cli.json_log);

    if cli.is_http_url() {
        let reader = HttpRangeReader::new(cli.file.clone()).await?;
        let crcs = reader.zip_crcs().await?;

        println!("{}\t{}", reader.size(), archash::crc_sum(&crcs));
        if cli.list {
            list_entries(&crcs);
        }
        tracing::info!(
            transferred = reader.transferred_bytes(),
            "remote Central Directory read"
        );
    } else {
        let (size, hash) = size_and_hash(&cli.file, &cli.format)
            .with_context(|| format!("cannot hash {}", cli.file))?;
        println!("{size}\t{hash}");

        if cli.list {
            let mut file = File::open(&cli.file)?;
            list_entries(&zip_crcs_from_stream(&mut file)?);
        }
    }

    Ok(())
}

/// Print `<crc32>\t<path>` per entry, sorted by path.
fn list_entries(crcs: &ZipCrcs) {
    let mut entries: Vec<_> = crcs.iter().collect();
    entries.sort();
    for (path, crc) in entries {
        println!("{crc:08x}\t{path}");
    }
}
