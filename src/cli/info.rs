use anyhow::{Context, Result};
use std::path::PathBuf;

use binpak::codec::PakReader;

/// Display the structure (or full contents) of a PAK file
pub fn run(file: PathBuf, json: bool, dump: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let reader = PakReader::open(&file)
        .with_context(|| format!("Failed to open PAK file: {}", file.display()))?;

    if dump {
        return dump_all(reader, &file);
    }

    let summary = reader
        .summarize()
        .with_context(|| format!("Failed to read PAK file: {}", file.display()))?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        );
    } else {
        println!("File: {}", file.display());
        print!("{}", summary);
    }
    Ok(())
}

fn dump_all<R: std::io::Read>(mut reader: PakReader<R>, file: &std::path::Path) -> Result<()> {
    println!("File: {}", file.display());
    println!("Groups: {}", reader.array_count());
    for group in 0..reader.array_count() {
        let count = reader
            .read_dataset_group_header()
            .with_context(|| format!("Failed to read header of group {}", group))?;
        println!();
        println!("Group {} ({} dataset(s))", group, count);
        for index in 0..count {
            let dataset = reader
                .read_dataset()
                .with_context(|| format!("Failed to read dataset {} of group {}", index, group))?;
            println!();
            print!("{}", dataset.dump());
        }
    }
    Ok(())
}
