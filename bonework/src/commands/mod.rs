//! Command implementations

pub mod pose;
pub mod skeleton;

use anyhow::{Context, Result};
use bonework_skeleton::{ImportData, LoadOptions, Skeleton};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read a JSON import file
pub fn read_import(path: &Path) -> Result<ImportData> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let data: ImportData = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse import data from {}", path.display()))?;

    log::info!(
        "Read {} joints, {} animations, {} frame values from {}",
        data.joints.len(),
        data.animations.len(),
        data.frames.len(),
        path.display()
    );
    Ok(data)
}

/// Read a JSON import file and build the skeleton
pub fn load(path: &Path, options: &LoadOptions) -> Result<Skeleton> {
    let data = read_import(path)?;
    Skeleton::load(&data, options)
        .with_context(|| format!("Failed to load skeleton from {}", path.display()))
}
