//! Config subcommand handlers.

use std::fmt::Write;

use dialoguer::{Input, Select};

use aihref_core::{CombineMode, DEFAULT_BACKEND_URL};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config as TOML-like text for the table view.
fn format_config(cfg: &Config) -> String {
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "insecure = {}", cfg.defaults.insecure);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "backend = \"{}\"", p.backend);
        let _ = writeln!(out, "combine_mode = \"{}\"", p.combine_mode);
        if let Some(top_n) = p.top_n {
            let _ = writeln!(out, "top_n = {top_n}");
        }
        if let Some(ref ca) = p.ca_cert {
            let _ = writeln!(out, "ca_cert = \"{}\"", ca.display());
        }
        if let Some(insecure) = p.insecure {
            let _ = writeln!(out, "insecure = {insecure}");
        }
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
        for site in p.sites.iter().flatten() {
            let _ = writeln!(out);
            let _ = writeln!(out, "[[profiles.{name}.sites]]");
            let _ = writeln!(out, "id = \"{}\"", site.id);
            let _ = writeln!(out, "name = \"{}\"", site.name);
            if !site.website.is_empty() {
                let _ = writeln!(out, "website = \"{}\"", site.website);
            }
        }
    }

    out.trim_end().to_owned()
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn sorted_profile_names(cfg: &Config) -> Vec<&String> {
    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    names
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("AIHref analytics: configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let backend: String = Input::new()
                .with_prompt("Backend URL")
                .default(DEFAULT_BACKEND_URL.into())
                .validate_with(|input: &String| {
                    url::Url::parse(input)
                        .map(|_| ())
                        .map_err(|e| format!("invalid URL: {e}"))
                })
                .interact_text()
                .map_err(prompt_err)?;

            let mode_choices = &[
                "Combine on this machine (recommended)",
                "Use the backend's combined endpoint",
            ];
            let mode = match Select::new()
                .with_prompt("How should site analytics be combined?")
                .items(mode_choices)
                .default(0)
                .interact()
                .map_err(prompt_err)?
            {
                0 => CombineMode::Client,
                _ => CombineMode::Backend,
            };

            let profile = Profile {
                backend,
                combine_mode: mode.to_string(),
                ..Profile::default()
            };

            // Keep any profiles that already exist
            let mut cfg = config::load_config().unwrap_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            config::save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Test it: aihref health");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let out = output::render_single(&global.output, &cfg, format_config, |_| {
                "config".into()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config()?;
            let active = config::active_profile_name(global, &cfg);
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: aihref config init");
            } else {
                for name in sorted_profile_names(&cfg) {
                    let marker = if *name == active { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            eprintln!("✓ Default profile set to '{name}'");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use aihref_config::{Defaults, SiteEntry};

    use super::*;

    #[test]
    fn format_lists_profiles_with_sites() {
        let mut profiles = HashMap::new();
        profiles.insert(
            "work".to_owned(),
            Profile {
                backend: "https://analytics.example.com".into(),
                sites: Some(vec![SiteEntry {
                    id: "greplus".into(),
                    name: "GRE Plus".into(),
                    website: String::new(),
                }]),
                top_n: Some(5),
                ..Profile::default()
            },
        );
        let cfg = Config {
            default_profile: Some("work".into()),
            defaults: Defaults::default(),
            profiles,
        };

        let text = format_config(&cfg);
        assert!(text.starts_with("default_profile = \"work\""));
        assert!(text.contains("[profiles.work]\nbackend = \"https://analytics.example.com\""));
        assert!(text.contains("top_n = 5"));
        assert!(text.contains("[[profiles.work.sites]]\nid = \"greplus\"\nname = \"GRE Plus\""));
        assert!(!text.contains("website"));
    }
}
