//! Command-line argument parsing for the headless grid driver
//!
//! Supports:
//! - Choosing the schema and row store
//! - Importing and exporting CSV
//! - Replaying a keystroke script against the grid

use clap::Parser;
use std::path::PathBuf;

use crate::config::GridConfig;

/// Keyboard-driven order grid
#[derive(Parser, Debug, Default)]
#[command(
    name = "ordergrid",
    version,
    about = "Edit garment order rows from the command line"
)]
pub struct CliArgs {
    /// Column schema (YAML)
    #[arg(long, value_name = "FILE")]
    pub schema: Option<PathBuf>,

    /// JSON row store
    #[arg(long, value_name = "FILE")]
    pub store: Option<PathBuf>,

    /// Append rows from a CSV/TSV file as new rows
    #[arg(long, value_name = "CSV")]
    pub import: Option<PathBuf>,

    /// Write all rows to a CSV/TSV file after running
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Replay keystrokes and mouse actions from a script
    #[arg(long, value_name = "FILE")]
    pub script: Option<PathBuf>,

    /// Keep copy/paste inside this process
    #[arg(long)]
    pub no_system_clipboard: bool,

    /// Leave dirty rows unsaved
    #[arg(long)]
    pub no_save: bool,
}

/// Configuration derived from CLI arguments and the config file
#[derive(Debug, Clone, PartialEq)]
pub struct StartupConfig {
    /// None means the built-in garment order schema
    pub schema: Option<PathBuf>,
    pub store: PathBuf,
    pub import: Option<PathBuf>,
    pub export: Option<PathBuf>,
    pub script: Option<PathBuf>,
    pub system_clipboard: bool,
    pub save: bool,
}

impl CliArgs {
    /// Merge parsed CLI args over the loaded config; flags win
    pub fn into_config(self, config: GridConfig) -> Result<StartupConfig, String> {
        let store = match self.store {
            Some(path) => path,
            None => config
                .store_path()
                .ok_or_else(|| "No row store given and no config directory available".to_string())?,
        };

        Ok(StartupConfig {
            schema: self.schema.or(config.schema),
            store,
            import: self.import,
            export: self.export,
            script: self.script,
            system_clipboard: config.system_clipboard && !self.no_system_clipboard,
            save: !self.no_save,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let config = GridConfig {
            schema: Some(PathBuf::from("config-schema.yaml")),
            store: Some(PathBuf::from("config-rows.json")),
            system_clipboard: true,
        };
        let args = CliArgs {
            schema: Some(PathBuf::from("cli-schema.yaml")),
            store: Some(PathBuf::from("cli-rows.json")),
            no_system_clipboard: true,
            ..Default::default()
        };
        let startup = args.into_config(config).unwrap();
        assert_eq!(startup.schema, Some(PathBuf::from("cli-schema.yaml")));
        assert_eq!(startup.store, PathBuf::from("cli-rows.json"));
        assert!(!startup.system_clipboard);
        assert!(startup.save);
    }

    #[test]
    fn test_config_used_when_flags_absent() {
        let config = GridConfig {
            schema: Some(PathBuf::from("orders.yaml")),
            store: Some(PathBuf::from("rows.json")),
            system_clipboard: false,
        };
        let startup = CliArgs::default().into_config(config).unwrap();
        assert_eq!(startup.schema, Some(PathBuf::from("orders.yaml")));
        assert_eq!(startup.store, PathBuf::from("rows.json"));
        assert!(!startup.system_clipboard);
    }

    #[test]
    fn test_no_save_flag() {
        let args = CliArgs {
            store: Some(PathBuf::from("rows.json")),
            no_save: true,
            ..Default::default()
        };
        assert!(!args.into_config(GridConfig::default()).unwrap().save);
    }

    #[test]
    fn test_parse_from_command_line() {
        let args = CliArgs::parse_from([
            "ordergrid",
            "--store",
            "rows.json",
            "--script",
            "steps.txt",
            "--no-save",
        ]);
        assert_eq!(args.store, Some(PathBuf::from("rows.json")));
        assert_eq!(args.script, Some(PathBuf::from("steps.txt")));
        assert!(args.no_save);
        assert!(!args.no_system_clipboard);
    }
}
