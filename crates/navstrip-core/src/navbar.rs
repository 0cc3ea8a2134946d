//! The navigation bar: owner of the surface and every state machine.
//!
//! All mutation happens on the owner thread through `&mut self`. Store
//! notifications queue up on a [`Subscription`] and are applied by
//! [`NavigationBar::pump_settings`].

use std::fmt::Write as _;
use std::sync::Arc;

use navstrip_types::action::ActionSpec;
use navstrip_types::color::{Color, to_hex};
use navstrip_types::error::NavError;
use navstrip_types::input::{LayoutDirection, Rotation, TouchEvent, TouchTarget};
use navstrip_types::settings::NavSettings;

use crate::button::{ButtonRole, IdGenerator};
use crate::dimmer::{DimState, FULL_ALPHA, IdleDimmer};
use crate::disabled::{
    DisableFlags, DisableState, DisabledStateMachine, LockTaskSource, NavigationHints, NoLockTask,
    query_lock_task,
};
use crate::factory::{ButtonFactory, ButtonStyle};
use crate::icons::IconResolver;
use crate::menu::{ImeState, MenuPolicy, MenuStateMachine};
use crate::orientation::OrientationAdapter;
use crate::store::{SettingKey, SettingsStore, Subscription};
use crate::surface::{Axis, ContainerKind, NavigationSurface, Transition};

/// Measured size of a layout box, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutSize {
    pub width: u32,
    pub height: u32,
}

impl LayoutSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

type VerticalListener = Box<dyn FnMut(bool)>;

pub struct NavigationBar {
    settings: NavSettings,
    resolver: Box<dyn IconResolver>,
    lock_task: Box<dyn LockTaskSource>,
    surface: NavigationSurface,
    ids: IdGenerator,
    built_from: Option<(Vec<ActionSpec>, ButtonStyle)>,
    menu: MenuStateMachine,
    disabled: DisabledStateMachine,
    dimmer: IdleDimmer,
    orientation: OrientationAdapter,
    disabled_bits: u32,
    hints: NavigationHints,
    menu_override: bool,
    show_menu: bool,
    screen_on: bool,
    slippery: bool,
    relayout_requested: bool,
    store: Option<Arc<dyn SettingsStore>>,
    subscription: Option<Subscription>,
    vertical_listener: Option<VerticalListener>,
}

impl NavigationBar {
    /// Build both rows from `settings` and apply the initial state.
    pub fn new(settings: NavSettings, resolver: Box<dyn IconResolver>) -> Self {
        let mut bar = Self {
            dimmer: IdleDimmer::new(settings.dim.clone()),
            orientation: OrientationAdapter::new(settings.can_move),
            settings,
            resolver,
            lock_task: Box::new(NoLockTask),
            surface: NavigationSurface::new(),
            ids: IdGenerator::new(),
            built_from: None,
            menu: MenuStateMachine::new(),
            disabled: DisabledStateMachine::new(),
            disabled_bits: 0,
            hints: NavigationHints::empty(),
            menu_override: false,
            show_menu: false,
            screen_on: true,
            slippery: false,
            relayout_requested: false,
            store: None,
            subscription: None,
            vertical_listener: None,
        };
        bar.dimmer.set_expanded_desktop(bar.settings.expanded_desktop());
        bar.rebuild(true);
        bar
    }

    /// Use `source` for the lock-task exception.
    pub fn with_lock_task_source(mut self, source: Box<dyn LockTaskSource>) -> Self {
        self.lock_task = source;
        self.refresh(true);
        self
    }

    pub fn set_vertical_listener(&mut self, listener: impl FnMut(bool) + 'static) {
        self.vertical_listener = Some(Box::new(listener));
    }

    // -- accessors -------------------------------------------------------

    pub fn surface(&self) -> &NavigationSurface {
        &self.surface
    }

    pub fn settings(&self) -> &NavSettings {
        &self.settings
    }

    pub fn dim_state(&self) -> DimState {
        self.dimmer.state()
    }

    pub fn is_vertical(&self) -> bool {
        self.surface.active().axis() == Axis::Vertical
    }

    pub fn is_slippery(&self) -> bool {
        self.slippery
    }

    pub fn show_menu(&self) -> bool {
        self.show_menu
    }

    pub fn disabled_flags(&self) -> u32 {
        self.disabled_bits
    }

    pub fn navigation_hints(&self) -> NavigationHints {
        self.hints
    }

    pub fn is_screen_on(&self) -> bool {
        self.screen_on
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Whether a corrective re-layout is pending.
    pub fn relayout_requested(&self) -> bool {
        self.relayout_requested
    }

    /// Consume the pending re-layout request.
    pub fn take_relayout_request(&mut self) -> bool {
        std::mem::take(&mut self.relayout_requested)
    }

    // -- rebuild ---------------------------------------------------------

    fn style(&self) -> ButtonStyle {
        ButtonStyle {
            base_color: self.settings.button_color(Color::WHITE),
            tint_mode: self.settings.tint_mode(),
            ripple: self.settings.ripple(),
        }
    }

    /// Recreate both rows from the current settings. Without `force`, an
    /// unchanged button set and style is left alone. Returns whether the rows
    /// were rebuilt.
    pub fn rebuild(&mut self, force: bool) -> bool {
        let specs = self.settings.resolved_actions();
        let style = self.style();
        if !force
            && self
                .built_from
                .as_ref()
                .is_some_and(|(s, st)| *s == specs && *st == style)
        {
            return false;
        }

        let factory = ButtonFactory::new(&*self.resolver, style);
        let primary = factory.build(&specs, ContainerKind::Primary.axis(), &mut self.ids);
        let rotated = factory.build(&specs, ContainerKind::Rotated.axis(), &mut self.ids);
        self.surface.install(primary, rotated);
        self.orientation.on_rebuilt(&mut self.surface);
        log::info!("Rebuilt navigation rows with {} buttons", specs.len());
        self.built_from = Some((specs, style));

        self.select_rotation(self.orientation.rotation());
        self.menu.invalidate();
        self.refresh(true);
        self.dimmer.reset();
        self.sync_alpha();
        true
    }

    /// Re-run both state machines against the active container.
    fn refresh(&mut self, force: bool) -> Vec<Transition> {
        let state = DisableState {
            flags: DisableFlags::from_bits_truncate(self.disabled_bits),
            back_alt_active: self.hints.contains(NavigationHints::BACK_ALT),
            lock_task_active: query_lock_task(&*self.lock_task),
        };
        let container = self.surface.active_mut();
        let outcome = self.disabled.apply(container, state, force);
        self.slippery = outcome.disables.slippery();
        let mut transitions = outcome.transitions;
        if outcome.disables.home {
            self.menu.invalidate();
        } else {
            transitions.extend(self.refresh_menu(force || outcome.home_restored));
        }
        transitions
    }

    fn menu_policy(&self) -> MenuPolicy {
        MenuPolicy {
            visibility_mode: self.settings.menu_visibility(),
            location: self.settings.menu_location(),
            override_active: self.menu_override,
        }
    }

    fn ime_state(&self) -> ImeState {
        let arrows = self.settings.ime_arrows;
        ImeState {
            switcher_visible: self.hints.contains(NavigationHints::IME_SHOWN) && !arrows,
            arrows_visible: self.hints.contains(NavigationHints::BACK_ALT) && arrows,
            arrow_policy_enabled: arrows,
        }
    }

    fn refresh_menu(&mut self, force: bool) -> Vec<Transition> {
        if self.disabled.disables().home {
            return Vec::new();
        }
        let policy = self.menu_policy();
        let ime = self.ime_state();
        let container = self.surface.active_mut();
        self.menu
            .apply(container, &policy, &ime, self.show_menu, force)
            .transitions
    }

    // -- shell operations ------------------------------------------------

    /// Apply a system disable bitmask. Returns the transitions committed.
    pub fn set_disabled_flags(&mut self, bits: u32, force: bool) -> Vec<Transition> {
        self.disabled_bits = bits;
        self.refresh(force)
    }

    pub fn set_menu_override(&mut self, active: bool) -> Vec<Transition> {
        self.menu_override = active;
        self.refresh_menu(false)
    }

    pub fn set_show_menu(&mut self, show: bool, force: bool) -> Vec<Transition> {
        self.show_menu = show;
        self.refresh_menu(force)
    }

    pub fn set_navigation_hints(&mut self, hints: NavigationHints, force: bool) -> Vec<Transition> {
        if !force && hints == self.hints {
            return Vec::new();
        }
        self.hints = hints;
        self.refresh(true)
    }

    pub fn notify_screen_on(&mut self, on: bool) {
        self.screen_on = on;
        self.refresh(true);
        if on {
            self.dimmer.reset();
            self.sync_alpha();
        }
    }

    pub fn set_device_locked(&mut self, locked: bool) {
        self.dimmer.set_device_locked(locked);
        self.refresh(true);
        self.sync_alpha();
    }

    pub fn set_power_save(&mut self, on: bool) {
        self.dimmer.set_power_save(on);
        self.sync_alpha();
    }

    pub fn on_rotate(&mut self, rotation: Rotation) {
        self.select_rotation(rotation);
        self.refresh(true);
        self.dimmer.reset();
        self.sync_alpha();
    }

    fn select_rotation(&mut self, rotation: Rotation) {
        let change = self.orientation.select(&mut self.surface, rotation);
        if change.axis_changed() {
            let vertical = change.to.axis() == Axis::Vertical;
            if let Some(listener) = self.vertical_listener.as_mut() {
                listener(vertical);
            }
        }
    }

    /// Returns whether the vertical rows were reordered.
    pub fn on_text_direction_changed(&mut self, direction: LayoutDirection) -> bool {
        self.orientation.apply_direction(&mut self.surface, direction)
    }

    /// Route a touch to the dimmer. Returns whether the strip consumed it.
    pub fn on_touch(&mut self, event: TouchEvent, target: TouchTarget) -> bool {
        if matches!(event, TouchEvent::Cancel) {
            return false;
        }
        match target {
            TouchTarget::ButtonRow => {
                self.dimmer.on_touch();
                self.sync_alpha();
                true
            },
            TouchTarget::Strip => {
                if self.settings.dim.touch_anywhere {
                    self.dimmer.on_touch();
                    self.sync_alpha();
                }
                false
            },
        }
    }

    /// Advance the frame clock.
    pub fn tick(&mut self, dt_ms: u32) {
        self.dimmer.tick(dt_ms);
        self.sync_alpha();
    }

    fn sync_alpha(&mut self) {
        let active = self.surface.active_kind();
        let alpha = self.dimmer.alpha();
        for kind in ContainerKind::ALL {
            self.surface.container_mut(kind).alpha = if kind == active { alpha } else { FULL_ALPHA };
        }
    }

    /// Compare the bar's size with the active container's. Returns whether
    /// they agree; a mismatch requests one corrective re-layout.
    pub fn check_layout(&mut self, expected: LayoutSize, observed: LayoutSize) -> bool {
        if expected == observed {
            return true;
        }
        if self.relayout_requested {
            log::debug!("Layout still invalid, re-layout already pending");
        } else {
            let err = NavError::Layout(format!(
                "this={}x{} cur={}x{}",
                expected.width, expected.height, observed.width, observed.height
            ));
            log::warn!("Invalid layout in navigation bar ({err})");
            self.relayout_requested = true;
        }
        false
    }

    // -- store -----------------------------------------------------------

    /// Observe `store` and take its current settings.
    pub fn attach(&mut self, store: Arc<dyn SettingsStore>) {
        self.subscription = Some(store.subscribe());
        let snapshot = store.snapshot();
        self.store = Some(store);
        self.apply_settings(snapshot);
        self.rebuild(true);
    }

    /// Stop observing the store. The current settings stay in effect.
    pub fn detach(&mut self) {
        if let Some(sub) = self.subscription.take() {
            sub.unsubscribe();
        }
        self.store = None;
    }

    /// Apply queued store notifications. Returns whether anything changed.
    pub fn pump_settings(&mut self) -> bool {
        let Some(sub) = self.subscription.as_ref() else {
            return false;
        };
        let keys = sub.drain();
        if keys.is_empty() {
            return false;
        }
        let Some(snapshot) = self.store.as_ref().map(|s| s.snapshot()) else {
            return false;
        };
        log::debug!("Applying {} setting changes", keys.len());
        let moved = self.apply_settings(snapshot);
        if keys.iter().any(|k| k.requires_rebuild()) {
            let forced = moved || keys.contains(&SettingKey::CanMove);
            if !self.rebuild(forced) {
                self.refresh(false);
            }
        }
        true
    }

    /// Returns whether the rotation availability changed.
    fn apply_settings(&mut self, settings: NavSettings) -> bool {
        let moved = settings.can_move != self.orientation.can_move();
        if settings.dim != self.settings.dim {
            self.dimmer.configure(settings.dim.clone());
        }
        self.dimmer.set_expanded_desktop(settings.expanded_desktop());
        self.orientation.set_can_move(settings.can_move);
        self.settings = settings;
        self.sync_alpha();
        moved
    }

    // -- diagnostics -----------------------------------------------------

    pub fn dump(&self) -> String {
        let mut out = String::new();
        let active = self.surface.active();
        let _ = writeln!(out, "NavigationBarView {{");
        let _ = writeln!(
            out,
            "      mCurrentView: {} rotation={}",
            active.kind().label(),
            self.orientation.rotation().degrees()
        );
        let _ = writeln!(
            out,
            "      disabled=0x{:08x} vertical={} menu={}",
            self.disabled_bits,
            self.is_vertical(),
            self.show_menu
        );
        let dim = self.dimmer.state();
        let _ = writeln!(
            out,
            "      dim: dim={} animating={} suppressed={} slippery={}",
            dim.is_dim, dim.is_animating, dim.suppressed, self.slippery
        );
        for el in active.row().iter().filter(|e| e.role != ButtonRole::Separator) {
            let _ = write!(
                out,
                "      {}: id={} {} alpha={:.2}",
                el.role.label(),
                el.id,
                el.visibility,
                active.alpha
            );
            if let Some(tint) = el.tint {
                let _ = write!(out, " tint={}", to_hex(tint));
            }
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "    }}");
        out
    }
}
