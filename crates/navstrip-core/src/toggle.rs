//! Quick-access toggle for the on-screen strip.

use std::sync::Arc;

use crate::store::{SettingKey, SettingsStore, Subscription};

/// Where a long press on the toggle leads.
pub const NAVIGATION_SETTINGS_TARGET: &str = "settings/navigation";

/// Reflects and flips the `nav_bar_show` setting.
pub struct NavBarToggle {
    store: Arc<dyn SettingsStore>,
    subscription: Option<Subscription>,
    enabled: bool,
}

impl NavBarToggle {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        let enabled = store.snapshot().nav_bar_show;
        Self {
            store,
            subscription: None,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }

    /// Start or stop following the store.
    pub fn set_listening(&mut self, listening: bool) {
        match (listening, self.subscription.take()) {
            (true, None) => {
                self.subscription = Some(self.store.subscribe());
                self.enabled = self.store.snapshot().nav_bar_show;
            },
            (true, Some(sub)) => self.subscription = Some(sub),
            (false, Some(sub)) => sub.unsubscribe(),
            (false, None) => {},
        }
    }

    /// Pick up queued changes. Returns whether the displayed state changed.
    pub fn refresh(&mut self) -> bool {
        let Some(sub) = self.subscription.as_ref() else {
            return false;
        };
        if !sub.drain().contains(&SettingKey::NavBarShow) {
            return false;
        }
        let enabled = self.store.snapshot().nav_bar_show;
        let changed = enabled != self.enabled;
        self.enabled = enabled;
        changed
    }

    /// Flip the setting. The displayed state follows on the next refresh.
    pub fn handle_click(&mut self) {
        let next = !self.enabled;
        self.store
            .put(SettingKey::NavBarShow, &mut |s| s.nav_bar_show = next);
        log::info!("Navigation bar {}", if next { "enabled" } else { "disabled" });
    }

    pub fn handle_long_click(&self) -> &'static str {
        NAVIGATION_SETTINGS_TARGET
    }
}
