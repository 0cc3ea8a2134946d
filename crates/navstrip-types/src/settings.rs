//! User settings consumed by the navigation strip.
//!
//! Mirrors the keys the settings store persists. Integer-coded settings keep
//! their stored representation and are decoded through `from_setting`, so
//! unknown values fall back to the stock default instead of failing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::action::{ActionSpec, default_actions, parse_action_list_or_empty};
use crate::color::Color;
use crate::error::{NavError, Result};

/// Stored color value meaning "use the stock color".
pub const COLOR_DEFAULT: i64 = -2;

/// Policy string that turns on expanded desktop for every app.
pub const EXPANDED_DESKTOP_POLICY: &str = "immersive.full=*";

/// How configured button icons are tinted with the base color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TintMode {
    /// Tint every icon.
    Always,
    /// Leave user-picked custom icons untinted.
    SkipCustom,
    /// Never tint.
    Never,
}

impl TintMode {
    /// Decode the stored value. `2` is reserved and tints like `0`.
    pub fn from_setting(value: i32) -> Self {
        match value {
            1 => Self::SkipCustom,
            3 => Self::Never,
            _ => Self::Always,
        }
    }
}

/// Which side(s) the overflow menu key occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuLocation {
    Right,
    Left,
    Both,
}

impl MenuLocation {
    pub fn from_setting(value: i32) -> Self {
        match value {
            1 => Self::Left,
            2 => Self::Both,
            _ => Self::Right,
        }
    }

    pub fn includes_left(self) -> bool {
        matches!(self, Self::Left | Self::Both)
    }

    pub fn includes_right(self) -> bool {
        matches!(self, Self::Right | Self::Both)
    }
}

/// When the overflow menu key is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuVisibilityMode {
    /// Always shown.
    Always,
    /// Never shown, even when an app requests it.
    Never,
    /// Shown when the foreground app requests it.
    System,
}

impl MenuVisibilityMode {
    pub fn from_setting(value: i32) -> Self {
        match value {
            0 => Self::Always,
            1 => Self::Never,
            _ => Self::System,
        }
    }
}

/// Idle-dim settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimSettings {
    /// Dim the buttons after inactivity.
    #[serde(default)]
    pub enabled: bool,
    /// Inactivity before dimming, in milliseconds.
    #[serde(default = "default_dim_timeout")]
    pub timeout_ms: u32,
    /// Target alpha as a percentage (0-100).
    #[serde(default = "default_dim_alpha")]
    pub alpha_percent: u8,
    /// Fade instead of jumping to the target alpha.
    #[serde(default)]
    pub animate: bool,
    /// Fade duration in milliseconds.
    #[serde(default = "default_dim_duration")]
    pub animate_duration_ms: u32,
    /// Any touch on the strip window resets the dim, not just the button row.
    #[serde(default)]
    pub touch_anywhere: bool,
}

fn default_dim_timeout() -> u32 {
    3000
}
fn default_dim_alpha() -> u8 {
    50
}
fn default_dim_duration() -> u32 {
    2000
}

impl Default for DimSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_ms: default_dim_timeout(),
            alpha_percent: default_dim_alpha(),
            animate: false,
            animate_duration_ms: default_dim_duration(),
            touch_anywhere: false,
        }
    }
}

impl DimSettings {
    /// Target alpha in `[0.0, 1.0]`.
    pub fn dim_alpha(&self) -> f32 {
        f32::from(self.alpha_percent.min(100)) / 100.0
    }
}

/// All navigation strip settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavSettings {
    /// Ordered button set.
    #[serde(default = "default_actions")]
    pub actions: Vec<ActionSpec>,
    /// Serialized action list as kept by the store. Overrides `actions`
    /// when present; malformed input yields no buttons.
    #[serde(default)]
    pub actions_json: Option<String>,
    /// Base button tint (`0xAARRGGBB` as a signed int, `-2` = stock).
    #[serde(default = "default_color")]
    pub button_tint: i64,
    /// Tint mode (`0` always, `1` skip custom icons, `3` never).
    #[serde(default)]
    pub button_tint_mode: i32,
    /// Touch ripple color (`-2` = stock).
    #[serde(default = "default_color")]
    pub ripple_color: i64,
    /// Menu location (`0` right, `1` left, `2` both).
    #[serde(default)]
    pub menu_location: i32,
    /// Menu visibility (`0` always, `1` never, `2` system).
    #[serde(default = "default_menu_visibility")]
    pub menu_visibility: i32,
    /// Replace the menu / IME switch keys with cursor arrows while typing.
    #[serde(default)]
    pub ime_arrows: bool,
    #[serde(default)]
    pub dim: DimSettings,
    /// The strip follows display rotation.
    #[serde(default = "yes")]
    pub can_move: bool,
    /// Global immersive policy string.
    #[serde(default)]
    pub policy_control: Option<String>,
    /// Whether the on-screen strip is enabled at all.
    #[serde(default)]
    pub nav_bar_show: bool,
}

fn default_color() -> i64 {
    COLOR_DEFAULT
}
fn default_menu_visibility() -> i32 {
    2
}
fn yes() -> bool {
    true
}

impl Default for NavSettings {
    fn default() -> Self {
        Self {
            actions: default_actions(),
            actions_json: None,
            button_tint: COLOR_DEFAULT,
            button_tint_mode: 0,
            ripple_color: COLOR_DEFAULT,
            menu_location: 0,
            menu_visibility: default_menu_visibility(),
            ime_arrows: false,
            dim: DimSettings::default(),
            can_move: true,
            policy_control: None,
            nav_bar_show: false,
        }
    }
}

impl NavSettings {
    /// Parse settings from a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load settings from a TOML file. Parse failures name the file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        toml::from_str(&text).map_err(|e| NavError::Config(format!("{}: {e}", path.display())))
    }

    /// The effective button set.
    pub fn resolved_actions(&self) -> Vec<ActionSpec> {
        match &self.actions_json {
            Some(json) => parse_action_list_or_empty(json),
            None => self.actions.clone(),
        }
    }

    /// Base tint, with the stock color substituted for `-2`.
    pub fn button_color(&self, stock: Color) -> Color {
        decode_color(self.button_tint).unwrap_or(stock)
    }

    /// Ripple color, or `None` for the stock ripple.
    pub fn ripple(&self) -> Option<Color> {
        decode_color(self.ripple_color)
    }

    pub fn tint_mode(&self) -> TintMode {
        TintMode::from_setting(self.button_tint_mode)
    }

    pub fn menu_location(&self) -> MenuLocation {
        MenuLocation::from_setting(self.menu_location)
    }

    pub fn menu_visibility(&self) -> MenuVisibilityMode {
        MenuVisibilityMode::from_setting(self.menu_visibility)
    }

    /// Expanded desktop is on only for the exact global policy literal.
    pub fn expanded_desktop(&self) -> bool {
        self.policy_control.as_deref() == Some(EXPANDED_DESKTOP_POLICY)
    }
}

fn decode_color(value: i64) -> Option<Color> {
    if value == COLOR_DEFAULT {
        None
    } else {
        Some(Color::from_argb(value as u32))
    }
}
