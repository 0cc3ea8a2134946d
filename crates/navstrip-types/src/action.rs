//! Action specs: one configured strip button each.
//!
//! The settings store holds the button set as an ordered list of
//! `(click action, long-press action, icon)` triples. Built-in system
//! actions share the reserved `**` prefix; anything else is an opaque custom
//! action (app shortcut, intent URI, ...).

use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};

/// Reserved prefix for built-in system actions.
pub const SYSTEM_ACTION_PREFIX: &str = "**";

pub const ACTION_BACK: &str = "**back**";
pub const ACTION_HOME: &str = "**home**";
pub const ACTION_RECENTS: &str = "**recents**";
pub const ACTION_MENU: &str = "**menu**";
pub const ACTION_IME: &str = "**ime**";
pub const ACTION_IME_NAVIGATION_LEFT: &str = "**ime_nav_left**";
pub const ACTION_IME_NAVIGATION_RIGHT: &str = "**ime_nav_right**";
pub const ACTION_IME_NAVIGATION_UP: &str = "**ime_nav_up**";
pub const ACTION_IME_NAVIGATION_DOWN: &str = "**ime_nav_down**";
pub const ACTION_NULL: &str = "**null**";

/// Icon sentinel meaning "no custom icon, use the action default".
pub const ICON_EMPTY: &str = "empty";

/// Prefix marking icons supplied by the system icon pack.
pub const SYSTEM_ICON_IDENTIFIER: &str = "system_shortcut=";

/// One configured button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub click_action: String,
    #[serde(default = "default_longpress")]
    pub longpress_action: String,
    #[serde(default = "default_icon")]
    pub icon: String,
}

fn default_longpress() -> String {
    ACTION_NULL.to_string()
}

fn default_icon() -> String {
    ICON_EMPTY.to_string()
}

impl ActionSpec {
    /// A spec with no long-press and the default icon.
    pub fn new(click_action: &str) -> Self {
        Self {
            click_action: click_action.to_string(),
            longpress_action: default_longpress(),
            icon: default_icon(),
        }
    }

    /// Builder-style long-press override.
    pub fn with_longpress(mut self, action: &str) -> Self {
        self.longpress_action = action.to_string();
        self
    }

    /// Builder-style icon override.
    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = icon.to_string();
        self
    }

    /// Whether the click action is a built-in system action.
    pub fn is_system_action(&self) -> bool {
        self.click_action.starts_with(SYSTEM_ACTION_PREFIX)
    }

    /// Whether no custom icon is configured.
    pub fn has_empty_icon(&self) -> bool {
        is_empty_icon(&self.icon)
    }

    /// Whether the icon is a user-picked resource (not empty, not from the
    /// system icon pack).
    pub fn has_custom_icon(&self) -> bool {
        !self.has_empty_icon() && !self.icon.starts_with(SYSTEM_ICON_IDENTIFIER)
    }
}

/// `""` and the `empty` literal both mean "no icon".
pub fn is_empty_icon(icon: &str) -> bool {
    icon.is_empty() || icon == ICON_EMPTY
}

/// The stock button set: back, home, recents.
pub fn default_actions() -> Vec<ActionSpec> {
    vec![
        ActionSpec::new(ACTION_BACK),
        ActionSpec::new(ACTION_HOME),
        ActionSpec::new(ACTION_RECENTS),
    ]
}

/// Parse the store's serialized action list (a JSON array of specs).
///
/// Entries with an empty click action are rejected.
pub fn parse_action_list(json: &str) -> Result<Vec<ActionSpec>> {
    let specs: Vec<ActionSpec> = serde_json::from_str(json)?;
    if let Some(idx) = specs.iter().position(|s| s.click_action.is_empty()) {
        return Err(NavError::ActionList(format!(
            "entry {idx} has an empty click action"
        )));
    }
    Ok(specs)
}

/// Parse the action list, degrading to an empty list on malformed input.
pub fn parse_action_list_or_empty(json: &str) -> Vec<ActionSpec> {
    match parse_action_list(json) {
        Ok(specs) => specs,
        Err(e) => {
            log::warn!("Ignoring malformed action list: {e}");
            Vec::new()
        },
    }
}
