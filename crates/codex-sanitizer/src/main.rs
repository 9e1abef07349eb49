use std::process::ExitCode;

use env_flags::env_flags;

use codex_sanitizer::cli::{self, Invocation, USAGE, USAGE_EXIT_CODE};
use codex_sanitizer::config::{load_user_config, resolve_home, resolve_sanitize_options};
use codex_sanitizer::logging::{LogEnv, init_tracing, resolve_log_settings};
use codex_sanitizer::sanitize_file;

fn main() -> anyhow::Result<ExitCode> {
    env_flags! {
        /// Home directory (config.toml, logs). Defaults to $HOME/.sanitize-codex
        SANITIZE_CODEX_HOME: &str = "";
        /// Keys starting with this prefix are stripped from each codex item.
        SANITIZE_PRIVATE_PREFIX: &str = "_";
        /// Indentation width of the written JSON. Parsed leniently.
        SANITIZE_INDENT: &str = "2";
    }

    let home = resolve_home(*SANITIZE_CODEX_HOME);
    // A broken config.toml is reported once tracing is up, then ignored.
    let (user_cfg, cfg_error) = match load_user_config(&home) {
        Ok(cfg) => (cfg, None),
        Err(e) => (None, Some(e)),
    };

    let log_settings = resolve_log_settings(
        &home,
        &LogEnv::from_env(),
        user_cfg.as_ref().and_then(|c| c.logging.as_ref()),
    );
    let _log_guard = init_tracing(&log_settings);
    if let Some(e) = cfg_error {
        tracing::warn!(
            "ignoring unreadable config {}: {:#}",
            home.join("config.toml").display(),
            e
        );
    }
    tracing::debug!("home={}", home.display());

    let (input, output) = match cli::parse_args(std::env::args_os().skip(1)) {
        Invocation::Usage => {
            println!("{USAGE}");
            return Ok(ExitCode::from(USAGE_EXIT_CODE));
        }
        Invocation::Sanitize { input, output } => (input, output),
    };

    let env_set = |k: &str| std::env::var_os(k).is_some();
    let options = resolve_sanitize_options(
        env_set("SANITIZE_PRIVATE_PREFIX").then(|| *SANITIZE_PRIVATE_PREFIX),
        env_set("SANITIZE_INDENT").then(|| *SANITIZE_INDENT),
        user_cfg.as_ref().and_then(|c| c.sanitize.as_ref()),
    );
    tracing::debug!(
        "sanitizing {} -> {} (prefix='{}', indent={})",
        input.display(),
        output.display(),
        options.private_prefix,
        options.indent
    );

    sanitize_file(&input, &output, &options)?;
    println!("{}", cli::confirmation(&output));
    Ok(ExitCode::SUCCESS)
}
