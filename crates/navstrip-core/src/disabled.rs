//! Disabled-flags state machine.
//!
//! Maps the system disable bitmask onto the fixed navigation buttons, with
//! the lock-task exception for recents and the keyboard-dismiss exception for
//! back.

use bitflags::bitflags;
use navstrip_types::error::Result;

use crate::button::{ButtonRole, Visibility};
use crate::menu::AuxAssignment;
use crate::surface::{Container, Transition};

bitflags! {
    /// System disable bits relevant to the strip.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DisableFlags: u32 {
        const HOME = 0x0020_0000;
        const BACK = 0x0040_0000;
        const RECENT = 0x0100_0000;
    }
}

bitflags! {
    /// Navigation hints published by the focused window.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NavigationHints: u32 {
        /// Back dismisses the keyboard.
        const BACK_ALT = 1 << 0;
        /// A keyboard is on screen.
        const IME_SHOWN = 1 << 1;
    }
}

/// Inputs to the disabled-flags decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisableState {
    pub flags: DisableFlags,
    pub back_alt_active: bool,
    pub lock_task_active: bool,
}

/// Which fixed buttons end up disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ButtonDisables {
    pub home: bool,
    pub back: bool,
    pub recent: bool,
}

impl ButtonDisables {
    pub fn compute(state: &DisableState) -> Self {
        let home = state.flags.contains(DisableFlags::HOME);
        let back = state.flags.contains(DisableFlags::BACK) && !state.back_alt_active;
        let mut recent = state.flags.contains(DisableFlags::RECENT);
        // Pinned apps keep recents reachable to leave the pin.
        if state.lock_task_active && recent && !home {
            recent = false;
        }
        Self { home, back, recent }
    }

    /// Touches should slide through the strip to the window behind it.
    pub fn slippery(&self) -> bool {
        self.home && self.back && self.recent
    }

    fn visibility(disabled: bool) -> Visibility {
        if disabled {
            Visibility::Invisible
        } else {
            Visibility::Visible
        }
    }

    /// Target visibility for a configured button of `role`.
    pub fn visibility_for(&self, role: ButtonRole) -> Option<Visibility> {
        match role {
            ButtonRole::Back => Some(Self::visibility(self.back)),
            ButtonRole::Home | ButtonRole::Custom => Some(Self::visibility(self.home)),
            ButtonRole::Recents => Some(Self::visibility(self.recent)),
            _ => None,
        }
    }
}

/// Answers whether the device is pinned to a single task.
pub trait LockTaskSource {
    fn in_lock_task(&self) -> Result<bool>;
}

/// Source for hosts without task pinning.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLockTask;

impl LockTaskSource for NoLockTask {
    fn in_lock_task(&self) -> Result<bool> {
        Ok(false)
    }
}

/// Query `source`, treating failure as "not pinned".
pub fn query_lock_task(source: &dyn LockTaskSource) -> bool {
    match source.in_lock_task() {
        Ok(active) => active,
        Err(e) => {
            log::warn!("Lock task state unavailable, assuming unpinned: {e}");
            false
        },
    }
}

/// Result of one state machine invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisabledOutcome {
    pub transitions: Vec<Transition>,
    pub disables: ButtonDisables,
    /// Home went from disabled to enabled; the menu state must be re-applied.
    pub home_restored: bool,
    pub skipped: bool,
}

/// Tracks the last applied state so unchanged requests are skipped.
#[derive(Debug, Default)]
pub struct DisabledStateMachine {
    last: Option<DisableState>,
    disables: ButtonDisables,
}

impl DisabledStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Disables currently in effect.
    pub fn disables(&self) -> ButtonDisables {
        self.disables
    }

    pub fn flags(&self) -> DisableFlags {
        self.last.map(|s| s.flags).unwrap_or_default()
    }

    /// Compute and commit button visibility for `container`.
    pub fn apply(
        &mut self,
        container: &mut Container,
        state: DisableState,
        force: bool,
    ) -> DisabledOutcome {
        if !force && self.last == Some(state) {
            return DisabledOutcome {
                disables: self.disables,
                skipped: true,
                ..DisabledOutcome::default()
            };
        }

        let previous = self.disables;
        let disables = ButtonDisables::compute(&state);
        let mut transitions = Vec::new();

        let slots: Vec<(usize, ButtonRole)> = container
            .row()
            .iter()
            .filter_map(|e| e.slot.map(|s| (s, e.role)))
            .collect();
        for (slot, role) in slots {
            if let Some(vis) = disables.visibility_for(role) {
                transitions.extend(container.set_slot_visibility(slot, vis));
            }
        }
        if disables.home {
            transitions.extend(AuxAssignment::hidden().apply(container));
        }

        container.set_back_alt(state.back_alt_active);

        let home_restored = previous.home && !disables.home;
        self.last = Some(state);
        self.disables = disables;

        if !transitions.is_empty() {
            log::debug!(
                "Disable flags 0x{:08x} applied to {}: home={} back={} recent={}",
                state.flags.bits(),
                container.kind().label(),
                disables.home,
                disables.back,
                disables.recent
            );
        }

        DisabledOutcome {
            transitions,
            disables,
            home_restored,
            skipped: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::IdGenerator;
    use crate::factory::{ButtonFactory, ButtonStyle};
    use crate::icons::StaticIconResolver;
    use crate::surface::{Axis, ContainerKind};
    use navstrip_types::action::{ActionSpec, default_actions};
    use navstrip_types::error::NavError;

    fn container(specs: &[ActionSpec]) -> Container {
        let resolver = StaticIconResolver::new();
        let factory = ButtonFactory::new(&resolver, ButtonStyle::default());
        let mut c = Container::new(ContainerKind::Primary);
        c.install(factory.build(specs, Axis::Horizontal, &mut IdGenerator::new()));
        c
    }

    struct FailingSource;

    impl LockTaskSource for FailingSource {
        fn in_lock_task(&self) -> Result<bool> {
            Err(NavError::LockTask("service gone".into()))
        }
    }

    #[test]
    fn flag_bits_match_platform_values() {
        assert_eq!(DisableFlags::HOME.bits(), 0x0020_0000);
        assert_eq!(DisableFlags::BACK.bits(), 0x0040_0000);
        assert_eq!(DisableFlags::RECENT.bits(), 0x0100_0000);
    }

    #[test]
    fn back_alt_keeps_back_enabled() {
        let state = DisableState {
            flags: DisableFlags::BACK,
            back_alt_active: true,
            lock_task_active: false,
        };
        assert!(!ButtonDisables::compute(&state).back);
    }

    #[test]
    fn lock_task_keeps_recents_unless_home_disabled() {
        let mut state = DisableState {
            flags: DisableFlags::RECENT,
            back_alt_active: false,
            lock_task_active: true,
        };
        assert!(!ButtonDisables::compute(&state).recent);
        state.flags |= DisableFlags::HOME;
        assert!(ButtonDisables::compute(&state).recent);
    }

    #[test]
    fn failing_source_means_unpinned() {
        assert!(!query_lock_task(&FailingSource));
        assert!(!query_lock_task(&NoLockTask));
    }

    #[test]
    fn disabled_buttons_become_invisible() {
        let mut c = container(&default_actions());
        let mut sm = DisabledStateMachine::new();
        let state = DisableState {
            flags: DisableFlags::BACK | DisableFlags::RECENT,
            ..DisableState::default()
        };
        sm.apply(&mut c, state, false);
        assert_eq!(c.find(ButtonRole::Back).unwrap().visibility, Visibility::Invisible);
        assert_eq!(c.find(ButtonRole::Recents).unwrap().visibility, Visibility::Invisible);
        assert_eq!(c.find(ButtonRole::Home).unwrap().visibility, Visibility::Visible);
    }

    #[test]
    fn custom_buttons_follow_home() {
        let specs = vec![ActionSpec::new("app:camera"), ActionSpec::new("app:mail")];
        let mut c = container(&specs);
        let mut sm = DisabledStateMachine::new();
        let state = DisableState {
            flags: DisableFlags::HOME,
            ..DisableState::default()
        };
        sm.apply(&mut c, state, false);
        assert!(c.custom_buttons().iter().all(|b| b.visibility == Visibility::Invisible));
    }

    #[test]
    fn home_disable_hides_aux_and_reports_restore() {
        let mut c = container(&default_actions());
        c.set_role_visibility(ButtonRole::MenuRight, Visibility::Visible);
        let mut sm = DisabledStateMachine::new();
        let disabled = DisableState {
            flags: DisableFlags::HOME,
            ..DisableState::default()
        };
        let out = sm.apply(&mut c, disabled, false);
        assert!(!out.home_restored);
        for role in ButtonRole::AUXILIARY {
            assert!(!c.find(role).unwrap().is_visible(), "{role:?}");
        }
        let out = sm.apply(&mut c, DisableState::default(), false);
        assert!(out.home_restored);
    }

    #[test]
    fn unchanged_state_is_skipped_unless_forced() {
        let mut c = container(&default_actions());
        let mut sm = DisabledStateMachine::new();
        let state = DisableState {
            flags: DisableFlags::RECENT,
            ..DisableState::default()
        };
        assert!(!sm.apply(&mut c, state, false).skipped);
        assert!(sm.apply(&mut c, state, false).skipped);
        assert!(!sm.apply(&mut c, state, true).skipped);
        assert_eq!(sm.flags(), DisableFlags::RECENT);
    }

    #[test]
    fn slippery_only_when_all_disabled() {
        let all = DisableState {
            flags: DisableFlags::all(),
            ..DisableState::default()
        };
        assert!(ButtonDisables::compute(&all).slippery());
        let some = DisableState {
            flags: DisableFlags::HOME | DisableFlags::BACK,
            ..DisableState::default()
        };
        assert!(!ButtonDisables::compute(&some).slippery());
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        fn arb_state() -> impl Strategy<Value = DisableState> {
            (any::<u32>(), any::<bool>(), any::<bool>()).prop_map(|(bits, back_alt, lock)| {
                DisableState {
                    flags: DisableFlags::from_bits_truncate(bits),
                    back_alt_active: back_alt,
                    lock_task_active: lock,
                }
            })
        }

        proptest! {
            #[test]
            fn lock_task_without_home_disable_keeps_recents(state in arb_state()) {
                let d = ButtonDisables::compute(&state);
                if state.lock_task_active && !d.home {
                    prop_assert!(!d.recent);
                }
            }

            #[test]
            fn back_alt_never_disables_back(state in arb_state()) {
                let d = ButtonDisables::compute(&state);
                if state.back_alt_active {
                    prop_assert!(!d.back);
                }
            }

            #[test]
            fn home_disable_hides_every_aux_control(state in arb_state()) {
                let mut c = container(&default_actions());
                for role in ButtonRole::AUXILIARY {
                    c.set_role_visibility(role, Visibility::Visible);
                }
                let mut sm = DisabledStateMachine::new();
                sm.apply(&mut c, state, false);
                if state.flags.contains(DisableFlags::HOME) {
                    for role in ButtonRole::AUXILIARY {
                        prop_assert!(!c.find(role).unwrap().is_visible());
                    }
                }
            }
        }
    }
}
