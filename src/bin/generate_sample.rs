use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hatvp_dataviz::data::aggregate;
use hatvp_dataviz::data::sample::{self, DEFAULT_SEED};
use hatvp_dataviz::data::Dataset;

fn write(dir: &Path, dataset: &Dataset) -> Result<()> {
    let path = dir.join(dataset.name());
    let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
    aggregate::write_csv(dataset, file).with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {} rows to {}", dataset.len(), path.display());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let out_dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"));
    let seed = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid seed '{s}'"))?,
        None => DEFAULT_SEED,
    };
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    for dataset in sample::generate(seed) {
        write(&out_dir, &dataset)?;
    }
    Ok(())
}
