use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$COINWISE_HOME`, else `~/.coinwise`.
pub fn coinwise_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("COINWISE_HOME").filter(|d| !d.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".coinwise"))
}

pub fn ensure_coinwise_home() -> Result<PathBuf> {
    let dir = coinwise_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}
