use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub fn mutasi_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("MUTASI_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".mutasi"))
}

pub fn ensure_mutasi_home() -> Result<PathBuf> {
    let dir = mutasi_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub async fn read_token_dump(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("read {}", path.display()))
}
