//! Tracing setup. Logs go to stderr (stdout carries the usage and
//! confirmation lines) and optionally to a daily-rolling file.

use std::io::IsTerminal as _;
use std::path::{Path, PathBuf};

use env_flags::env_flags;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer, Registry};

use crate::config::LoggingCfg;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Resolved logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub filter: String,
    pub json: bool,
    pub pretty: bool,
    pub to_file: bool,
    pub dir: PathBuf,
}

/// Logging overrides taken from the environment. `None` means the variable
/// is unset and the config file or default applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogEnv {
    pub filter: Option<String>,
    pub json: Option<bool>,
    pub pretty: Option<bool>,
    pub to_file: Option<bool>,
    pub dir: Option<String>,
}

impl LogEnv {
    pub fn from_env() -> Self {
        env_flags! {
            /// Tracing filter, e.g. "info", "debug", or targets format.
            RUST_LOG: &str = "warn";
            /// Preferred filter env (alias). If set, overrides RUST_LOG.
            TRACING_FILTER: &str = "";
            /// JSON formatting for logs
            TRACING_JSON: bool = false;
            /// Multi-line pretty formatting (ignored if TRACING_JSON=true)
            TRACING_PRETTY: bool = false;
            /// If true, also log to file under <home>/logs or LOG_DIR
            LOG_TO_FILE: bool = false;
            /// Optional explicit log directory. Defaults to <home>/logs
            LOG_DIR: &str = "";
        }

        let env_set = |k: &str| std::env::var_os(k).is_some();
        let filter = if !(*TRACING_FILTER).is_empty() {
            Some((*TRACING_FILTER).to_string())
        } else if env_set("RUST_LOG") {
            Some((*RUST_LOG).to_string())
        } else {
            None
        };
        Self {
            filter,
            json: env_set("TRACING_JSON").then(|| *TRACING_JSON),
            pretty: env_set("TRACING_PRETTY").then(|| *TRACING_PRETTY),
            to_file: env_set("LOG_TO_FILE").then(|| *LOG_TO_FILE),
            dir: (!(*LOG_DIR).is_empty()).then(|| (*LOG_DIR).to_string()),
        }
    }
}

/// Merge env overrides with the optional `[logging]` table. A value present
/// in `env` always wins over the config file.
pub fn resolve_log_settings(home: &Path, env: &LogEnv, cfg: Option<&LoggingCfg>) -> LogSettings {
    let filter = env
        .filter
        .clone()
        .or_else(|| cfg.and_then(|c| c.level.clone()))
        .unwrap_or_else(|| "warn".to_string());
    let dir = env
        .dir
        .as_deref()
        .or_else(|| cfg.and_then(|c| c.dir.as_deref()))
        .map(crate::config::expand_home)
        .unwrap_or_else(|| home.join("logs"));
    LogSettings {
        filter,
        json: env.json.or_else(|| cfg.and_then(|c| c.json)).unwrap_or(false),
        pretty: env.pretty.or_else(|| cfg.and_then(|c| c.pretty)).unwrap_or(false),
        to_file: env.to_file.or_else(|| cfg.and_then(|c| c.to_file)).unwrap_or(false),
        dir,
    }
}

fn fmt_layer<W>(writer: W, ansi: bool, json: bool, pretty: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let base = tracing_subscriber::fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(writer);
    if json {
        base.json().boxed()
    } else if pretty {
        base.pretty().boxed()
    } else {
        base.compact().boxed()
    }
}

/// Install the global subscriber. Keep the returned guard alive until exit so
/// buffered file logs are flushed.
pub fn init_tracing(settings: &LogSettings) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_new(&settings.filter).unwrap_or_else(|_| EnvFilter::new("warn"));

    let mut layers: Vec<BoxedLayer> = vec![fmt_layer(
        std::io::stderr,
        std::io::stderr().is_terminal(),
        settings.json,
        settings.pretty,
    )];

    let mut guard = None;
    let mut dir_error = None;
    if settings.to_file {
        match std::fs::create_dir_all(&settings.dir) {
            Ok(()) => {
                let appender = tracing_appender::rolling::daily(&settings.dir, "sanitize-codex.log");
                let (nb, g) = tracing_appender::non_blocking(appender);
                guard = Some(g);
                layers.push(fmt_layer(nb, false, settings.json, settings.pretty));
            }
            Err(e) => dir_error = Some(e),
        }
    }

    let subscriber = tracing_subscriber::registry().with(layers).with(filter);
    if let Err(e) = subscriber.try_init() {
        tracing::debug!("tracing already set: {:?}", e);
    }
    if let Some(e) = dir_error {
        tracing::warn!(
            "failed to create log dir {}: {}",
            settings.dir.display(),
            e
        );
    }
    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = "/home/x/.sanitize-codex";

    fn cfg() -> LoggingCfg {
        LoggingCfg {
            to_file: Some(true),
            dir: Some("/tmp/sc-logs".into()),
            json: None,
            pretty: Some(true),
            level: Some("debug".into()),
        }
    }

    #[test]
    fn config_fills_in_unset_env() {
        let s = resolve_log_settings(Path::new(HOME), &LogEnv::default(), Some(&cfg()));
        assert_eq!(
            s,
            LogSettings {
                filter: "debug".into(),
                json: false,
                pretty: true,
                to_file: true,
                dir: PathBuf::from("/tmp/sc-logs"),
            }
        );
    }

    #[test]
    fn env_wins_over_config() {
        let env = LogEnv {
            filter: Some("trace".into()),
            json: Some(true),
            pretty: Some(false),
            to_file: Some(false),
            dir: Some("/var/log/sc".into()),
        };
        let s = resolve_log_settings(Path::new(HOME), &env, Some(&cfg()));
        assert_eq!(s.filter, "trace");
        assert!(s.json);
        assert!(!s.pretty);
        assert!(!s.to_file);
        assert_eq!(s.dir, PathBuf::from("/var/log/sc"));
    }

    #[test]
    fn defaults_log_under_home() {
        let s = resolve_log_settings(Path::new(HOME), &LogEnv::default(), None);
        assert_eq!(
            s,
            LogSettings {
                filter: "warn".into(),
                json: false,
                pretty: false,
                to_file: false,
                dir: PathBuf::from("/home/x/.sanitize-codex/logs"),
            }
        );
    }
}
