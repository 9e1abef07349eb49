use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::codex::{DEFAULT_INDENT, DEFAULT_PRIVATE_PREFIX, MAX_INDENT, SanitizeOptions};

#[derive(Debug, Default, Deserialize)]
pub struct UserConfig {
    pub logging: Option<LoggingCfg>,
    pub sanitize: Option<SanitizeCfg>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingCfg {
    pub to_file: Option<bool>,
    pub dir: Option<String>,
    pub json: Option<bool>,
    pub pretty: Option<bool>,
    pub level: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SanitizeCfg {
    pub private_prefix: Option<String>,
    pub indent: Option<usize>,
}

pub fn load_user_config(home: &Path) -> anyhow::Result<Option<UserConfig>> {
    let path = home.join("config.toml");
    if !path.exists() {
        return Ok(None);
    }
    let s = std::fs::read_to_string(&path)?;
    let cfg: UserConfig = toml::from_str(&s)?;
    Ok(Some(cfg))
}

pub fn expand_home(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Ok(home) = std::env::var("HOME")
    {
        return PathBuf::from(home).join(stripped);
    }
    PathBuf::from(path)
}

/// Home directory holding `config.toml` and default logs. An explicit value
/// wins, then `$HOME/.sanitize-codex`, then `./.sanitize-codex`.
pub fn resolve_home(explicit: &str) -> PathBuf {
    if !explicit.is_empty() {
        return expand_home(explicit);
    }
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".sanitize-codex");
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".sanitize-codex")
}

/// Merge sanitize settings: env value if set, else config file, else default.
/// `env_indent` is the raw env string; an unparsable value is ignored with a
/// warning and widths above [`MAX_INDENT`] are clamped.
pub fn resolve_sanitize_options(
    env_prefix: Option<&str>,
    env_indent: Option<&str>,
    cfg: Option<&SanitizeCfg>,
) -> SanitizeOptions {
    let prefix = env_prefix
        .map(str::to_string)
        .or_else(|| cfg.and_then(|c| c.private_prefix.clone()))
        .unwrap_or_else(|| DEFAULT_PRIVATE_PREFIX.to_string());
    let private_prefix = if prefix.is_empty() {
        tracing::warn!(
            "empty private prefix would strip every field; using '{}'",
            DEFAULT_PRIVATE_PREFIX
        );
        DEFAULT_PRIVATE_PREFIX.to_string()
    } else {
        prefix
    };
    let env_indent = env_indent.and_then(|raw| match raw.trim().parse::<usize>() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::warn!("ignoring invalid SANITIZE_INDENT '{}'", raw);
            None
        }
    });
    let mut indent = env_indent
        .or_else(|| cfg.and_then(|c| c.indent))
        .unwrap_or(DEFAULT_INDENT);
    if indent > MAX_INDENT {
        tracing::warn!("indent {} too wide; using {}", indent, MAX_INDENT);
        indent = MAX_INDENT;
    }
    SanitizeOptions {
        private_prefix,
        indent,
    }
}
