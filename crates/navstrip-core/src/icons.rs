//! Icon resolution seam.
//!
//! The action-resolution service lives outside the strip. It maps an action
//! id plus the configured icon reference to an image and may fail; the
//! factory treats failure as "no image".

use std::collections::{HashMap, HashSet};

use navstrip_types::action::{
    ACTION_BACK, ACTION_HOME, ACTION_IME, ACTION_IME_NAVIGATION_LEFT, ACTION_IME_NAVIGATION_RIGHT,
    ACTION_MENU, ACTION_RECENTS, is_empty_icon,
};
use navstrip_types::error::{NavError, Result};

use crate::button::Image;

/// Resolves action icons.
pub trait IconResolver {
    /// Produce an image for `action`, preferring the configured `icon`
    /// reference when it is not the empty sentinel.
    fn resolve(&self, action: &str, icon: &str) -> Result<Image>;
}

/// Table-driven resolver with stock icons for the built-in actions.
///
/// Custom icon references resolve to themselves. Custom actions without an
/// icon resolve through [`StaticIconResolver::with_app_icon`] entries.
#[derive(Debug, Clone)]
pub struct StaticIconResolver {
    stock: HashMap<String, String>,
    missing: HashSet<String>,
}

impl StaticIconResolver {
    pub fn new() -> Self {
        let stock = [
            (ACTION_BACK, "ic_sysbar_back"),
            (ACTION_HOME, "ic_sysbar_home"),
            (ACTION_RECENTS, "ic_sysbar_recent"),
            (ACTION_MENU, "ic_sysbar_menu"),
            (ACTION_IME, "ic_ime_switcher_default"),
            (ACTION_IME_NAVIGATION_LEFT, "ic_sysbar_ime_left"),
            (ACTION_IME_NAVIGATION_RIGHT, "ic_sysbar_ime_right"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            stock,
            missing: HashSet::new(),
        }
    }

    /// Register the launcher icon for a custom action.
    pub fn with_app_icon(mut self, action: &str, resource: &str) -> Self {
        self.stock.insert(action.to_string(), resource.to_string());
        self
    }

    /// Make every lookup for `action` fail.
    pub fn with_missing(mut self, action: &str) -> Self {
        self.missing.insert(action.to_string());
        self
    }
}

impl Default for StaticIconResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl IconResolver for StaticIconResolver {
    fn resolve(&self, action: &str, icon: &str) -> Result<Image> {
        if self.missing.contains(action) {
            return Err(NavError::Icon(format!("no icon for {action}")));
        }
        if !is_empty_icon(icon) {
            return Ok(Image::new(icon));
        }
        self.stock
            .get(action)
            .map(|res| Image::new(res))
            .ok_or_else(|| NavError::Icon(format!("no icon for {action}")))
    }
}
