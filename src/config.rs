use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    /// Message overrides and extra locales: locale name -> key -> text.
    #[serde(default)]
    pub locales: HashMap<String, HashMap<String, String>>,
    #[serde(default)]
    pub commands: Vec<CommandConfig>,
}

fn default_true() -> bool {
    true
}

fn default_min_width() -> u16 {
    60
}

fn default_width_ratio() -> f32 {
    0.66
}

fn default_margin() -> u16 {
    2
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_min_width")]
    pub min_width: u16,
    #[serde(default = "default_width_ratio")]
    pub width_ratio: f32,
    #[serde(default = "default_margin")]
    pub margin: u16,
    #[serde(default = "default_true")]
    pub suggest_on_unknown: bool,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            min_width: default_min_width(),
            width_ratio: default_width_ratio(),
            margin: default_margin(),
            suggest_on_unknown: true,
        }
    }
}

impl ConsoleConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.width_ratio > 0.0 && self.width_ratio <= 1.0) {
            bail!(
                "console.width_ratio must be in (0, 1], got {}",
                self.width_ratio
            );
        }
        Ok(())
    }
}

/// Color overrides; any value `ratatui` can parse (`"cyan"`, `"#5896c9"`, `"42"`).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ThemeConfig {
    #[serde(default)]
    pub accent: Option<String>,
    #[serde(default)]
    pub border: Option<String>,
    #[serde(default)]
    pub muted: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub chip: Option<String>,
    #[serde(default)]
    pub selection: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommandConfig {
    pub name: String,
    #[serde(default, alias = "local")]
    pub local_name: Option<String>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "cmd")]
    pub run: Option<String>,
    #[serde(default, deserialize_with = "deserialize_options")]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum OptionsConfig {
    Single(String),
    Many(Vec<String>),
}

fn deserialize_options<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let options = OptionsConfig::deserialize(deserializer)?;
    Ok(match options {
        OptionsConfig::Single(value) => vec![value],
        OptionsConfig::Many(values) => values,
    })
}

pub fn load(cwd: &Path, explicit_path: Option<&Path>) -> Result<LoadedConfig> {
    if let Some(path) = explicit_path {
        return Ok(LoadedConfig {
            config: load_from_path(path)?,
            path: Some(path.to_path_buf()),
        });
    }

    let local_candidates = [cwd.join("cmdcon.toml"), cwd.join(".cmdcon.toml")];
    for path in &local_candidates {
        if path.exists() {
            return Ok(LoadedConfig {
                config: load_from_path(path)?,
                path: Some(path.to_path_buf()),
            });
        }
    }

    let global_path = global_config_path()?;
    if global_path.exists() {
        return Ok(LoadedConfig {
            config: load_from_path(&global_path)?,
            path: Some(global_path),
        });
    }

    Ok(LoadedConfig {
        config: Config::default(),
        path: None,
    })
}

pub fn global_config_path() -> Result<PathBuf> {
    let config_root = dirs::config_dir().context("unable to resolve OS config directory")?;
    Ok(config_root.join("cmdcon").join("config.toml"))
}

pub fn write_example_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    fs::write(path, EXAMPLE_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

fn load_from_path(path: &Path) -> Result<Config> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("invalid TOML in {}", path.display()))?;
    config
        .console
        .validate()
        .with_context(|| format!("invalid console settings in {}", path.display()))?;
    Ok(config)
}

const EXAMPLE_CONFIG: &str = r##"# cmdcon config
#
# Commands are resolved by the first word of the input line (case-insensitive),
# matched against `name` first and `local_name` second.
# `run` is an optional shell template executed in the background:
# - {{command}}: canonical command name
# - {{args}}: everything typed after the command word
# `options` are offered as clickable chips after the command is dispatched.

locale = "en"

[console]
min_width = 60
width_ratio = 0.66
margin = 2
suggest_on_unknown = true

[theme]
accent = "#5896c9"
error = "lightred"

# Override built-in messages or add a locale:
#
# [locales.en]
# "main.commandLine.placeholder" = "Enter a command"
#
# [locales.de]
# "main.commandLine.unknownCommand" = "Unbekannter Befehl"

[[commands]]
name = "LINE"
local_name = "Line"
group = "ACAD"
description = "Create straight line segments"
run = "echo {{command}} {{args}}"
options = ["Undo", "Close"]

[[commands]]
name = "CIRCLE"
local_name = "Circle"
group = "ACAD"
description = "Create a circle"
run = "echo {{command}} {{args}}"
options = ["3P", "2P", "TTR"]

[[commands]]
name = "ZOOM"
local_name = "Zoom"
group = "ACAD"
description = "Zoom the view"
options = "Extents"
"##;

#[cfg(test)]
mod tests {
    use super::{Config, EXAMPLE_CONFIG};

    #[test]
    fn example_config_parses() {
        let cfg: Config = toml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(cfg.locale.as_deref(), Some("en"));
        assert_eq!(cfg.commands.len(), 3);
        assert_eq!(cfg.commands[0].local_name.as_deref(), Some("Line"));
        assert_eq!(cfg.commands[1].options, vec!["3P", "2P", "TTR"]);
        assert_eq!(cfg.commands[2].options, vec!["Extents"]);
        assert!(cfg.commands[2].run.is_none());
        assert_eq!(cfg.theme.accent.as_deref(), Some("#5896c9"));
    }

    #[test]
    fn missing_sections_use_defaults() {
        let raw = r#"
[[commands]]
name = "LINE"
cmd = "echo line"
"#;
        let cfg: Config = toml::from_str(raw).unwrap();
        assert_eq!(cfg.console.min_width, 60);
        assert_eq!(cfg.console.margin, 2);
        assert!(cfg.console.suggest_on_unknown);
        assert!((cfg.console.width_ratio - 0.66).abs() < f32::EPSILON);
        assert!(cfg.locale.is_none());
        assert!(cfg.locales.is_empty());
        assert_eq!(cfg.commands[0].run.as_deref(), Some("echo line"));
        assert!(cfg.commands[0].options.is_empty());
    }

    #[test]
    fn locale_tables_accept_dotted_keys() {
        let raw = r#"
[locales.de]
"main.commandLine.unknownCommand" = "Unbekannter Befehl"
"#;
        let cfg: Config = toml::from_str(raw).unwrap();
        assert_eq!(
            cfg.locales["de"]["main.commandLine.unknownCommand"],
            "Unbekannter Befehl"
        );
    }

    #[test]
    fn rejects_out_of_range_width_ratio() {
        let raw = r#"
[console]
width_ratio = 1.5
"#;
        let cfg: Config = toml::from_str(raw).unwrap();
        let err = cfg.console.validate().unwrap_err().to_string();
        assert!(err.contains("width_ratio"));
    }
}
