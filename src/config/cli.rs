use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "gestao-tools")]
#[command(about = "Maintenance patches for the gestao-inteligente front end")]
pub struct CliConfig {
    /// Root of the gestao-inteligente checkout; patch paths are relative to it
    #[arg(long, global = true, default_value = ".")]
    pub project_root: PathBuf,

    /// Report what would change without writing any file
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the built-in patch sets
    List,
    /// Conference edit/delete by conference_number, with error details
    FixApp,
    /// Error logging for addProductionOrder
    FixProductionOrder,
    /// 'Material' → 'Tipo de Material' in table headers
    FixMaterialHeaders,
    /// Inject addLotToProductionOrder into App.tsx
    UpdateApp,
    /// Apply the MSM color palette to components/
    UpdateColors,
    /// Apply patch sets declared in a TOML file
    Apply {
        #[arg(short, long)]
        config: PathBuf,

        /// Only run the patch set with this name
        #[arg(long)]
        name: Option<String>,
    },
}

impl Command {
    /// Name of the built-in patch set this command runs, if any.
    pub fn builtin_name(&self) -> Option<&'static str> {
        match self {
            Command::FixApp => Some("fix-app"),
            Command::FixProductionOrder => Some("fix-production-order"),
            Command::FixMaterialHeaders => Some("fix-material-headers"),
            Command::UpdateApp => Some("update-app"),
            Command::UpdateColors => Some("update-colors"),
            Command::List | Command::Apply { .. } => None,
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("project_root", &self.project_root.to_string_lossy())?;
        if let Command::Apply { config, .. } = &self.command {
            validate_path("config", &config.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::find_builtin;

    #[test]
    fn test_parse_builtin_command() {
        let config = CliConfig::try_parse_from([
            "gestao-tools",
            "--project-root",
            "/srv/gestao",
            "fix-material-headers",
            "--dry-run",
        ])
        .unwrap();

        assert_eq!(config.project_root, PathBuf::from("/srv/gestao"));
        assert!(config.dry_run);
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.command.builtin_name(), Some("fix-material-headers"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_every_builtin_command_has_a_patch_set() {
        for command in [
            Command::FixApp,
            Command::FixProductionOrder,
            Command::FixMaterialHeaders,
            Command::UpdateApp,
            Command::UpdateColors,
        ] {
            let name = command.builtin_name().unwrap();
            assert!(find_builtin(name).is_some(), "no patch set for {}", name);
        }
    }

    #[test]
    fn test_parse_apply_command() {
        let config = CliConfig::try_parse_from([
            "gestao-tools",
            "apply",
            "--config",
            "patches.toml",
            "--name",
            "headers",
            "--log-format",
            "json",
        ])
        .unwrap();

        assert_eq!(config.log_format, LogFormat::Json);
        match config.command {
            Command::Apply { config, name } => {
                assert_eq!(config, PathBuf::from("patches.toml"));
                assert_eq!(name.as_deref(), Some("headers"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
