//! Idle dimmer: fades the button row after a period without touches.
//!
//! ```text
//! Bright --(timeout)--> Dimming --(fade done)--> Dimmed
//!    ^                     |                        |
//!    +-----(touch/reset)---+------------------------+
//! ```
//!
//! Time only moves through [`IdleDimmer::tick`], driven by the host's frame
//! clock. The pending dim is a single slot: arming replaces whatever was
//! pending, and a cancelled task can never fire.

use navstrip_types::settings::DimSettings;

use crate::animation::{Tween, easing};

/// Alpha of the row at rest.
pub const FULL_ALPHA: f32 = 1.0;

/// Identifies one armed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskHandle(u64);

#[derive(Debug, Clone, Copy)]
struct PendingTask {
    handle: TaskHandle,
    remaining_ms: u32,
}

/// Single-slot delayed task.
#[derive(Debug, Default)]
pub struct DimTimer {
    slot: Option<PendingTask>,
    generation: u64,
}

impl DimTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel any pending task, then arm a new one.
    pub fn arm(&mut self, delay_ms: u32) -> TaskHandle {
        self.cancel();
        self.generation += 1;
        let handle = TaskHandle(self.generation);
        self.slot = Some(PendingTask {
            handle,
            remaining_ms: delay_ms,
        });
        handle
    }

    /// Returns whether a task was pending. Cancelling an empty slot is a no-op.
    pub fn cancel(&mut self) -> bool {
        self.slot.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.slot.is_some()
    }

    /// Advance the clock. Returns the task that came due, which is consumed.
    pub fn advance(&mut self, dt_ms: u32) -> Option<TaskHandle> {
        let task = self.slot.as_mut()?;
        task.remaining_ms = task.remaining_ms.saturating_sub(dt_ms);
        if task.remaining_ms == 0 {
            return self.slot.take().map(|p| p.handle);
        }
        None
    }
}

/// Snapshot of the dimmer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DimState {
    pub is_dim: bool,
    pub is_animating: bool,
    pub original_alpha: f32,
    pub dim_alpha: f32,
    pub timeout_ms: u32,
    pub animate: bool,
    pub animate_duration_ms: u32,
    pub suppressed: bool,
}

/// Why dimming is currently not allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Suppression {
    power_save: bool,
    locked: bool,
    expanded_desktop: bool,
}

impl Suppression {
    fn any(self) -> bool {
        self.power_save || self.locked || self.expanded_desktop
    }
}

#[derive(Debug)]
pub struct IdleDimmer {
    settings: DimSettings,
    original_alpha: f32,
    alpha: f32,
    is_dim: bool,
    fade: Option<Tween>,
    timer: DimTimer,
    suppression: Suppression,
}

impl Default for IdleDimmer {
    fn default() -> Self {
        Self::new(DimSettings::default())
    }
}

impl IdleDimmer {
    pub fn new(settings: DimSettings) -> Self {
        let mut dimmer = Self {
            settings,
            original_alpha: FULL_ALPHA,
            alpha: FULL_ALPHA,
            is_dim: false,
            fade: None,
            timer: DimTimer::new(),
            suppression: Suppression::default(),
        };
        dimmer.reset();
        dimmer
    }

    /// Replace the settings and start over from bright.
    pub fn configure(&mut self, settings: DimSettings) {
        self.settings = settings;
        self.reset();
    }

    pub fn settings(&self) -> &DimSettings {
        &self.settings
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppression.any()
    }

    pub fn is_armed(&self) -> bool {
        self.timer.is_armed()
    }

    pub fn state(&self) -> DimState {
        DimState {
            is_dim: self.is_dim,
            is_animating: self.fade.is_some(),
            original_alpha: self.original_alpha,
            dim_alpha: self.settings.dim_alpha(),
            timeout_ms: self.settings.timeout_ms,
            animate: self.settings.animate,
            animate_duration_ms: self.settings.animate_duration_ms,
            suppressed: self.is_suppressed(),
        }
    }

    /// Restore full brightness and re-arm the timeout when allowed.
    pub fn reset(&mut self) {
        self.fade = None;
        self.alpha = self.original_alpha;
        self.is_dim = false;
        self.timer.cancel();
        if self.settings.enabled && !self.is_suppressed() {
            self.timer.arm(self.settings.timeout_ms);
        }
    }

    /// A qualifying touch on the strip.
    pub fn on_touch(&mut self) {
        self.reset();
    }

    /// Advance the frame clock by `dt_ms`.
    pub fn tick(&mut self, dt_ms: u32) {
        if let Some(fade) = self.fade.as_mut() {
            self.alpha = fade.tick(dt_ms);
            if fade.is_finished() {
                self.fade = None;
            }
        }
        if self.timer.advance(dt_ms).is_some() {
            self.fire();
        }
    }

    fn fire(&mut self) {
        if self.is_dim || self.is_suppressed() || !self.settings.enabled {
            return;
        }
        self.is_dim = true;
        let target = self.settings.dim_alpha();
        if self.settings.animate {
            self.fade = Some(Tween::new(
                self.alpha,
                target,
                self.settings.animate_duration_ms,
                easing::ease_in_quad,
            ));
            log::debug!(
                "Fading strip to {target:.2} over {}ms",
                self.settings.animate_duration_ms
            );
        } else {
            self.alpha = target;
            log::debug!("Dimmed strip to {target:.2}");
        }
    }

    pub fn set_power_save(&mut self, on: bool) {
        self.update_suppression(Suppression {
            power_save: on,
            ..self.suppression
        });
    }

    pub fn set_device_locked(&mut self, locked: bool) {
        self.update_suppression(Suppression {
            locked,
            ..self.suppression
        });
    }

    pub fn set_expanded_desktop(&mut self, on: bool) {
        self.update_suppression(Suppression {
            expanded_desktop: on,
            ..self.suppression
        });
    }

    fn update_suppression(&mut self, next: Suppression) {
        if next == self.suppression {
            return;
        }
        self.suppression = next;
        self.reset();
    }
}
