use std::{fs::File, io::BufReader, path::Path};

use serde::{Serialize, de::DeserializeOwned};

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, anyhow::Error> {
    let file = File::open(path)?;
    let value = serde_json::from_reader(BufReader::new(file))?;

    Ok(value)
}

/// Writes pretty JSON, creating the parent folders.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), anyhow::Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(path, serde_json::to_string_pretty(value)?)?;

    Ok(())
}
