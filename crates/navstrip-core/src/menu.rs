//! Menu visibility state machine for the seven auxiliary controls.
//!
//! The decision is a pure function of ([`MenuPolicy`], [`ImeState`],
//! requested show). Applying it is a two-pass transaction: every control
//! leaving layout is collapsed first, then the remaining ones are shown or
//! hidden, so two mutually exclusive keys never occupy the row together
//! mid-transition.

use navstrip_types::settings::{MenuLocation, MenuVisibilityMode};

use crate::button::{ButtonRole, Visibility};
use crate::surface::{Container, Transition};

/// Menu-related policy inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuPolicy {
    pub visibility_mode: MenuVisibilityMode,
    pub location: MenuLocation,
    /// Force both menu keys on (e.g. hardware-key emulation).
    pub override_active: bool,
}

impl Default for MenuPolicy {
    fn default() -> Self {
        Self {
            visibility_mode: MenuVisibilityMode::System,
            location: MenuLocation::Right,
            override_active: false,
        }
    }
}

/// Keyboard-related inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImeState {
    /// The keyboard asks for a switcher affordance.
    pub switcher_visible: bool,
    /// Cursor arrows replace the side keys.
    pub arrows_visible: bool,
    /// The user enabled cursor arrows while typing.
    pub arrow_policy_enabled: bool,
}

/// Visibility for every auxiliary control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxAssignment {
    pub empty_left: Visibility,
    pub empty_right: Visibility,
    pub menu_left: Visibility,
    pub ime_left: Visibility,
    pub menu_right: Visibility,
    pub ime_right: Visibility,
    pub ime_switch: Visibility,
}

impl AuxAssignment {
    /// Decide the auxiliary state. First matching rule wins.
    pub fn compute(policy: &MenuPolicy, ime: &ImeState, requested_show: bool) -> Self {
        use Visibility::{Collapsed, Invisible, Visible};

        if ime.arrows_visible {
            return Self {
                empty_left: Collapsed,
                empty_right: Collapsed,
                menu_left: Collapsed,
                ime_left: Visible,
                menu_right: Collapsed,
                ime_right: Visible,
                ime_switch: Collapsed,
            };
        }
        if policy.override_active {
            return Self {
                empty_left: Collapsed,
                empty_right: Collapsed,
                menu_left: Visible,
                ime_left: Collapsed,
                menu_right: Visible,
                ime_right: Collapsed,
                ime_switch: Collapsed,
            };
        }

        let wanted = (policy.visibility_mode == MenuVisibilityMode::Always || requested_show)
            && policy.visibility_mode != MenuVisibilityMode::Never;
        let show_left = wanted && policy.location.includes_left();
        let show_right = wanted && policy.location.includes_right();

        let (empty_left, menu_left) = if show_left {
            (Collapsed, Visible)
        } else {
            (Invisible, Collapsed)
        };
        let (empty_right, menu_right, ime_switch) = if show_right {
            (Collapsed, Visible, Collapsed)
        } else if ime.switcher_visible {
            (Collapsed, Collapsed, Visible)
        } else {
            (Invisible, Collapsed, Collapsed)
        };

        Self {
            empty_left,
            empty_right,
            menu_left,
            ime_left: Collapsed,
            menu_right,
            ime_right: Collapsed,
            ime_switch,
        }
    }

    /// No navigation chrome: used while home is disabled.
    pub fn hidden() -> Self {
        use Visibility::{Collapsed, Invisible};
        Self {
            empty_left: Invisible,
            empty_right: Invisible,
            menu_left: Collapsed,
            ime_left: Collapsed,
            menu_right: Collapsed,
            ime_right: Collapsed,
            ime_switch: Collapsed,
        }
    }

    /// `(role, visibility)` pairs in commit order.
    pub fn entries(&self) -> [(ButtonRole, Visibility); 7] {
        [
            (ButtonRole::EmptyLeft, self.empty_left),
            (ButtonRole::EmptyRight, self.empty_right),
            (ButtonRole::MenuLeft, self.menu_left),
            (ButtonRole::ImeLeft, self.ime_left),
            (ButtonRole::MenuRight, self.menu_right),
            (ButtonRole::ImeRight, self.ime_right),
            (ButtonRole::ImeSwitch, self.ime_switch),
        ]
    }

    /// Commit to `container`: collapses first, then everything else.
    pub fn apply(&self, container: &mut Container) -> Vec<Transition> {
        let entries = self.entries();
        let mut applied = Vec::new();
        for (role, vis) in entries.iter().filter(|(_, v)| *v == Visibility::Collapsed) {
            applied.extend(container.set_role_visibility(*role, *vis));
        }
        for (role, vis) in entries.iter().filter(|(_, v)| *v != Visibility::Collapsed) {
            applied.extend(container.set_role_visibility(*role, *vis));
        }
        applied
    }
}

/// Result of one state machine invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuOutcome {
    /// Transitions committed, in commit order.
    pub transitions: Vec<Transition>,
    /// The call was skipped because nothing changed.
    pub skipped: bool,
}

impl MenuOutcome {
    /// Nothing changed on screen.
    pub fn is_noop(&self) -> bool {
        self.transitions.is_empty()
    }
}

/// Tracks what was last applied so unchanged requests are skipped.
#[derive(Debug, Default)]
pub struct MenuStateMachine {
    last: Option<(MenuPolicy, ImeState, bool)>,
}

impl MenuStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last applied requested-show value.
    pub fn show_menu(&self) -> bool {
        self.last.is_some_and(|(_, _, show)| show)
    }

    /// Compute and commit the auxiliary state for `container`.
    pub fn apply(
        &mut self,
        container: &mut Container,
        policy: &MenuPolicy,
        ime: &ImeState,
        requested_show: bool,
        force: bool,
    ) -> MenuOutcome {
        let inputs = (*policy, *ime, requested_show);
        if !force && self.last == Some(inputs) {
            return MenuOutcome {
                transitions: Vec::new(),
                skipped: true,
            };
        }
        let transitions = AuxAssignment::compute(policy, ime, requested_show).apply(container);
        self.last = Some(inputs);
        if !transitions.is_empty() {
            log::debug!(
                "Menu state applied to {}: {} transitions",
                container.kind().label(),
                transitions.len()
            );
        }
        MenuOutcome {
            transitions,
            skipped: false,
        }
    }

    /// Forget the last inputs; the next call always applies.
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}
