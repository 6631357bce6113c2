//! CLI configuration: thin wrapper around `aihref_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--backend, --timeout, etc.).

use aihref_core::DashboardConfig;
use clap::ValueEnum;
use tracing::warn;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use aihref_config::{
    Config, ConfigError, Defaults, Profile, config_path, load_config, save_config,
};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

pub(crate) fn available_profiles(config: &Config) -> String {
    let mut names: Vec<_> = config.profiles.keys().cloned().collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort();
    names.join(", ")
}

/// Fill `--output` and `--color` from `[defaults]` unless `explicit(id)`
/// reports the flag came from the command line or environment.
pub fn apply_defaults(global: &mut GlobalOpts, defaults: &Defaults, explicit: impl Fn(&str) -> bool) {
    if !explicit("output") {
        match OutputFormat::from_str(&defaults.output, true) {
            Ok(format) => global.output = format,
            Err(_) => warn!(value = %defaults.output, "ignoring unknown defaults.output"),
        }
    }
    if !explicit("color") {
        match ColorMode::from_str(&defaults.color, true) {
            Ok(mode) => global.color = mode,
            Err(_) => warn!(value = %defaults.color, "ignoring unknown defaults.color"),
        }
    }
}

/// Build a `DashboardConfig` from the config file, profile, and CLI overrides.
///
/// An explicitly requested profile must exist. Without one, the default
/// profile is used if present, otherwise built-in defaults.
pub fn resolve_dashboard_config(global: &GlobalOpts) -> Result<DashboardConfig, CliError> {
    let cfg = load_config()?;

    let mut profile = match cfg.profile(global.profile.as_deref()) {
        Ok(Some((_, p))) => p.clone(),
        Ok(None) => Profile::default(),
        Err(ConfigError::UnknownProfile { name }) => {
            return Err(CliError::ProfileNotFound {
                available: available_profiles(&cfg),
                name,
            });
        }
        Err(e) => return Err(e.into()),
    };

    // Flag > env > profile
    if let Some(ref backend) = global.backend {
        profile.backend.clone_from(backend);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    Ok(aihref_config::profile_to_dashboard_config(
        &profile,
        &cfg.defaults,
    )?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn defaults(output: &str, color: &str) -> Defaults {
        Defaults {
            output: output.into(),
            color: color.into(),
            ..Defaults::default()
        }
    }

    #[test]
    fn file_defaults_fill_unset_flags() {
        let mut cli = Cli::try_parse_from(["aihref", "sites"]).unwrap();
        apply_defaults(&mut cli.global, &defaults("plain", "never"), |_| false);
        assert!(matches!(cli.global.output, OutputFormat::Plain));
        assert!(matches!(cli.global.color, ColorMode::Never));
    }

    #[test]
    fn explicit_flags_beat_file_defaults() {
        let mut cli = Cli::try_parse_from(["aihref", "-o", "yaml", "sites"]).unwrap();
        apply_defaults(&mut cli.global, &defaults("plain", "always"), |id| id == "output");
        assert!(matches!(cli.global.output, OutputFormat::Yaml));
        assert!(matches!(cli.global.color, ColorMode::Always));
    }

    #[test]
    fn unknown_default_values_are_ignored() {
        let mut cli = Cli::try_parse_from(["aihref", "sites"]).unwrap();
        apply_defaults(&mut cli.global, &defaults("xml", "sometimes"), |_| false);
        assert!(matches!(cli.global.output, OutputFormat::Table));
        assert!(matches!(cli.global.color, ColorMode::Auto));
    }
}
