//! Navigation surface: the two per-orientation containers.
//!
//! The primary container serves rotations 0 and 180 and lays its row out
//! horizontally. The rotated container serves 90 and 270 and lays its row out
//! vertically. Each container owns its own row, lights-out row and custom id
//! registry; exactly one of them is active.

use navstrip_types::input::Rotation;

use crate::button::{
    ButtonElement, ButtonId, ButtonIdList, ButtonRole, Gravity, LightsOutDot, Visibility,
};
use crate::factory::BuiltRow;

/// Row layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Which of the two containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Primary,
    Rotated,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 2] = [ContainerKind::Primary, ContainerKind::Rotated];

    /// Opposite rotations share a container.
    pub fn for_rotation(rotation: Rotation) -> Self {
        match rotation {
            Rotation::R0 | Rotation::R180 => Self::Primary,
            Rotation::R90 | Rotation::R270 => Self::Rotated,
        }
    }

    pub fn axis(self) -> Axis {
        match self {
            Self::Primary => Axis::Horizontal,
            Self::Rotated => Axis::Vertical,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Primary => "rot0",
            Self::Rotated => "rot90",
        }
    }
}

/// A single visibility change applied to a row element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub role: ButtonRole,
    pub id: ButtonId,
    pub from: Visibility,
    pub to: Visibility,
}

/// One orientation-specific layout tree.
#[derive(Debug, Clone)]
pub struct Container {
    kind: ContainerKind,
    row: Vec<ButtonElement>,
    lights_out: Vec<LightsOutDot>,
    ids: ButtonIdList,
    visible: bool,
    /// Alpha of the whole button row.
    pub alpha: f32,
}

impl Container {
    pub fn new(kind: ContainerKind) -> Self {
        Self {
            kind,
            row: Vec::new(),
            lights_out: Vec::new(),
            ids: ButtonIdList::new(),
            visible: false,
            alpha: 1.0,
        }
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn axis(&self) -> Axis {
        self.kind.axis()
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Row children in layout order.
    pub fn row(&self) -> &[ButtonElement] {
        &self.row
    }

    pub fn lights_out(&self) -> &[LightsOutDot] {
        &self.lights_out
    }

    /// Generated custom ids in slot order.
    pub fn button_ids(&self) -> &ButtonIdList {
        &self.ids
    }

    /// Replace the whole row with a freshly built one.
    pub(crate) fn install(&mut self, built: BuiltRow) {
        self.row = built.elements;
        self.lights_out = built.lights_out;
        self.ids = built.ids;
    }

    /// First element with `role`.
    pub fn find(&self, role: ButtonRole) -> Option<&ButtonElement> {
        self.row.iter().find(|e| e.role == role)
    }

    pub fn find_mut(&mut self, role: ButtonRole) -> Option<&mut ButtonElement> {
        self.row.iter_mut().find(|e| e.role == role)
    }

    /// Element with identity `id` (never matches separators).
    pub fn by_id(&self, id: ButtonId) -> Option<&ButtonElement> {
        if id == ButtonId::NONE {
            return None;
        }
        self.row.iter().find(|e| e.id == id)
    }

    /// Element built from action slot `slot`.
    pub fn by_slot(&self, slot: usize) -> Option<&ButtonElement> {
        self.row.iter().find(|e| e.slot == Some(slot))
    }

    /// Custom buttons in slot order.
    pub fn custom_buttons(&self) -> Vec<&ButtonElement> {
        self.ids.ids().filter_map(|id| self.by_id(id)).collect()
    }

    /// Set the visibility of every element with `role`. Returns the applied
    /// transitions (nothing for unchanged elements).
    pub fn set_role_visibility(&mut self, role: ButtonRole, to: Visibility) -> Vec<Transition> {
        let mut out = Vec::new();
        for el in self.row.iter_mut().filter(|e| e.role == role) {
            if el.visibility != to {
                out.push(Transition {
                    role,
                    id: el.id,
                    from: el.visibility,
                    to,
                });
                el.visibility = to;
            }
        }
        out
    }

    /// Set the visibility of the element built from `slot`.
    pub fn set_slot_visibility(&mut self, slot: usize, to: Visibility) -> Option<Transition> {
        let el = self.row.iter_mut().find(|e| e.slot == Some(slot))?;
        if el.visibility == to {
            return None;
        }
        let t = Transition {
            role: el.role,
            id: el.id,
            from: el.visibility,
            to,
        };
        el.visibility = to;
        Some(t)
    }

    pub fn set_gravity(&mut self, role: ButtonRole, gravity: Gravity) {
        if let Some(el) = self.find_mut(role) {
            el.gravity = gravity;
        }
    }

    /// Reverse the child order of the row and its lights-out twin.
    pub(crate) fn reverse_children(&mut self) {
        self.row.reverse();
        self.lights_out.reverse();
    }

    /// Mark the back icon as the "dismiss keyboard" variant.
    pub(crate) fn set_back_alt(&mut self, back_alt: bool) {
        if let Some(icon) = self.find_mut(ButtonRole::Back).and_then(|b| b.icon.as_mut()) {
            icon.ime_visible = back_alt;
        }
    }
}

/// Owner of both containers.
#[derive(Debug, Clone)]
pub struct NavigationSurface {
    primary: Container,
    rotated: Container,
    active: ContainerKind,
}

impl NavigationSurface {
    /// A surface with both containers empty and the primary one active.
    pub fn new() -> Self {
        let mut surface = Self {
            primary: Container::new(ContainerKind::Primary),
            rotated: Container::new(ContainerKind::Rotated),
            active: ContainerKind::Primary,
        };
        surface.activate(ContainerKind::Primary);
        surface
    }

    pub fn active_kind(&self) -> ContainerKind {
        self.active
    }

    pub fn active(&self) -> &Container {
        self.container(self.active)
    }

    pub fn active_mut(&mut self) -> &mut Container {
        self.container_mut(self.active)
    }

    pub fn container(&self, kind: ContainerKind) -> &Container {
        match kind {
            ContainerKind::Primary => &self.primary,
            ContainerKind::Rotated => &self.rotated,
        }
    }

    pub fn container_mut(&mut self, kind: ContainerKind) -> &mut Container {
        match kind {
            ContainerKind::Primary => &mut self.primary,
            ContainerKind::Rotated => &mut self.rotated,
        }
    }

    /// Make `kind` the only visible container.
    pub fn activate(&mut self, kind: ContainerKind) {
        self.active = kind;
        self.primary.visible = kind == ContainerKind::Primary;
        self.rotated.visible = kind == ContainerKind::Rotated;
    }

    /// Install freshly built rows into their containers.
    pub(crate) fn install(&mut self, primary: BuiltRow, rotated: BuiltRow) {
        self.primary.install(primary);
        self.rotated.install(rotated);
    }

    /// Lookup by role in the active container.
    pub fn button(&self, role: ButtonRole) -> Option<&ButtonElement> {
        self.active().find(role)
    }

    /// Lookup by role in a specific container.
    pub fn button_in(&self, kind: ContainerKind, role: ButtonRole) -> Option<&ButtonElement> {
        self.container(kind).find(role)
    }

    /// Lookup by generated id in the active container.
    pub fn custom_button(&self, id: ButtonId) -> Option<&ButtonElement> {
        self.active().by_id(id)
    }
}

impl Default for NavigationSurface {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::button::IdGenerator;
    use crate::factory::{ButtonFactory, ButtonStyle};
    use crate::icons::StaticIconResolver;
    use navstrip_types::action::{ACTION_HOME, ActionSpec, default_actions};

    fn surface_with(specs: &[ActionSpec]) -> NavigationSurface {
        let resolver = StaticIconResolver::new();
        let factory = ButtonFactory::new(&resolver, ButtonStyle::default());
        let mut ids = IdGenerator::new();
        let primary = factory.build(specs, Axis::Horizontal, &mut ids);
        let rotated = factory.build(specs, Axis::Vertical, &mut ids);
        let mut surface = NavigationSurface::new();
        surface.install(primary, rotated);
        surface
    }

    #[test]
    fn rotation_mapping_shares_opposites() {
        assert_eq!(ContainerKind::for_rotation(Rotation::R0), ContainerKind::Primary);
        assert_eq!(ContainerKind::for_rotation(Rotation::R180), ContainerKind::Primary);
        assert_eq!(ContainerKind::for_rotation(Rotation::R90), ContainerKind::Rotated);
        assert_eq!(ContainerKind::for_rotation(Rotation::R270), ContainerKind::Rotated);
    }

    #[test]
    fn exactly_one_container_visible() {
        let mut s = NavigationSurface::new();
        assert!(s.container(ContainerKind::Primary).is_visible());
        assert!(!s.container(ContainerKind::Rotated).is_visible());
        s.activate(ContainerKind::Rotated);
        assert!(!s.container(ContainerKind::Primary).is_visible());
        assert!(s.container(ContainerKind::Rotated).is_visible());
        assert_eq!(s.active().kind(), ContainerKind::Rotated);
    }

    #[test]
    fn lookup_by_role_and_id() {
        let specs = vec![ActionSpec::new("app:camera"), ActionSpec::new(ACTION_HOME)];
        let s = surface_with(&specs);
        assert!(s.button(ButtonRole::Home).is_some());
        assert!(s.button(ButtonRole::Back).is_none());
        let id = s.active().button_ids().get(0).unwrap();
        assert_eq!(s.custom_button(id).unwrap().slot, Some(0));
        assert!(s.custom_button(ButtonId::NONE).is_none());
    }

    #[test]
    fn containers_have_distinct_custom_ids() {
        let specs = vec![ActionSpec::new("app:camera")];
        let s = surface_with(&specs);
        let p = s.container(ContainerKind::Primary).button_ids().get(0).unwrap();
        let r = s.container(ContainerKind::Rotated).button_ids().get(0).unwrap();
        assert_ne!(p, r);
        assert!(s.container(ContainerKind::Rotated).by_id(p).is_none());
    }

    #[test]
    fn role_visibility_reports_only_changes() {
        let mut s = surface_with(&default_actions());
        let t = s.active_mut().set_role_visibility(ButtonRole::MenuRight, Visibility::Visible);
        assert_eq!(t.len(), 1);
        assert_eq!(t[0].from, Visibility::Collapsed);
        let t = s.active_mut().set_role_visibility(ButtonRole::MenuRight, Visibility::Visible);
        assert!(t.is_empty());
    }

    #[test]
    fn slot_visibility() {
        let mut s = surface_with(&default_actions());
        let t = s.active_mut().set_slot_visibility(1, Visibility::Invisible).unwrap();
        assert_eq!(t.role, ButtonRole::Home);
        assert!(s.active_mut().set_slot_visibility(1, Visibility::Invisible).is_none());
        assert!(s.active_mut().set_slot_visibility(99, Visibility::Visible).is_none());
    }

    #[test]
    fn back_alt_marks_back_icon() {
        let mut s = surface_with(&default_actions());
        s.active_mut().set_back_alt(true);
        assert!(s.button(ButtonRole::Back).unwrap().icon.as_ref().unwrap().ime_visible);
    }
}
