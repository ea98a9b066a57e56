use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use crate::config::Provider;
use crate::state::ensure_coinwise_home;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthState {
    pub api_key: Option<String>,
}

fn auth_path() -> Result<PathBuf> {
    Ok(ensure_coinwise_home()?.join("auth.json"))
}

pub fn load_auth() -> Result<AuthState> {
    let p = auth_path()?;
    if !p.exists() {
        return Ok(AuthState::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Ok(serde_json::from_str(&s)?)
}

pub fn save_auth(auth: &AuthState) -> Result<()> {
    let p = auth_path()?;
    let s = serde_json::to_string_pretty(auth)?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

/// Provider env var first, then `auth.json`.
pub fn resolve_api_key(provider: Provider) -> Result<String> {
    let from_env = std::env::var(provider.api_key_env()).ok();
    match pick_key(from_env, load_auth()?) {
        Some(key) => Ok(key),
        None => bail!(
            "no API key; set {} or run: coinwise auth paste-api-key",
            provider.api_key_env()
        ),
    }
}

fn pick_key(from_env: Option<String>, stored: AuthState) -> Option<String> {
    from_env
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .or(stored.api_key.filter(|k| !k.trim().is_empty()))
}

fn prompt_secret(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

pub fn paste_api_key() -> Result<()> {
    let mut auth = load_auth()?;
    let key = prompt_secret("Paste completion API key (gsk_... for Groq, sk-... for OpenAI)")?;
    if key.is_empty() {
        bail!("no key entered");
    }
    auth.api_key = Some(key);
    save_auth(&auth)?;
    println!("Saved API key to {}", auth_path()?.display());
    Ok(())
}
