use std::str::FromStr;
use std::sync::OnceLock;

use anyhow::{Result, anyhow};
use ratatui::style::Color;

use crate::config::ThemeConfig;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    pub accent: Color,
    pub border: Color,
    pub muted: Color,
    pub error: Color,
    pub chip: Color,
    pub selection: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            accent: Color::Rgb(88, 150, 201),
            border: Color::Rgb(70, 84, 96),
            muted: Color::DarkGray,
            error: Color::LightRed,
            chip: Color::LightCyan,
            selection: Color::Rgb(42, 88, 116),
        }
    }
}

impl Theme {
    pub fn from_config(config: &ThemeConfig) -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            accent: parse_color("accent", config.accent.as_deref(), defaults.accent)?,
            border: parse_color("border", config.border.as_deref(), defaults.border)?,
            muted: parse_color("muted", config.muted.as_deref(), defaults.muted)?,
            error: parse_color("error", config.error.as_deref(), defaults.error)?,
            chip: parse_color("chip", config.chip.as_deref(), defaults.chip)?,
            selection: parse_color("selection", config.selection.as_deref(), defaults.selection)?,
        })
    }
}

/// Installs the process-wide theme. Only the first call wins; returns whether
/// this call installed it.
pub fn install(theme: Theme) -> bool {
    THEME.set(theme).is_ok()
}

/// The installed theme, or the default one when nothing was installed.
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

fn parse_color(field: &str, raw: Option<&str>, default: Color) -> Result<Color> {
    match raw {
        Some(value) => Color::from_str(value.trim())
            .map_err(|_| anyhow!("invalid color for theme.{field}: '{value}'")),
        None => Ok(default),
    }
}
