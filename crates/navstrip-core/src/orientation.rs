//! Container selection by rotation and RTL mirroring of vertical rows.

use navstrip_types::input::{LayoutDirection, Rotation};

use crate::button::{ButtonRole, Gravity};
use crate::surface::{Axis, ContainerKind, NavigationSurface};

/// What a rotation change did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationChange {
    pub from: ContainerKind,
    pub to: ContainerKind,
}

impl RotationChange {
    pub fn switched(&self) -> bool {
        self.from != self.to
    }

    /// The active row flipped between horizontal and vertical.
    pub fn axis_changed(&self) -> bool {
        self.from.axis() != self.to.axis()
    }
}

#[derive(Debug)]
pub struct OrientationAdapter {
    rotation: Rotation,
    can_move: bool,
    /// Direction currently applied to the vertical containers.
    applied: LayoutDirection,
}

impl OrientationAdapter {
    pub fn new(can_move: bool) -> Self {
        Self {
            rotation: Rotation::R0,
            can_move,
            applied: LayoutDirection::Ltr,
        }
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn direction(&self) -> LayoutDirection {
        self.applied
    }

    pub fn can_move(&self) -> bool {
        self.can_move
    }

    pub fn set_can_move(&mut self, can_move: bool) {
        self.can_move = can_move;
    }

    /// Container that should serve `rotation`.
    pub fn container_for(&self, rotation: Rotation) -> ContainerKind {
        if self.can_move {
            ContainerKind::for_rotation(rotation)
        } else {
            ContainerKind::Primary
        }
    }

    /// Activate the container for `rotation`.
    pub fn select(&mut self, surface: &mut NavigationSurface, rotation: Rotation) -> RotationChange {
        let from = surface.active_kind();
        let to = self.container_for(rotation);
        self.rotation = rotation;
        surface.activate(to);
        let change = RotationChange { from, to };
        if change.switched() {
            log::info!(
                "Rotation {}: switched {} -> {}",
                rotation.degrees(),
                from.label(),
                to.label()
            );
        }
        change
    }

    /// Mirror vertical containers for `direction`. Repeating the last applied
    /// direction does nothing.
    pub fn apply_direction(
        &mut self,
        surface: &mut NavigationSurface,
        direction: LayoutDirection,
    ) -> bool {
        if direction == self.applied {
            return false;
        }
        mirror(surface, direction);
        self.applied = direction;
        log::debug!("Applied {direction:?} ordering to vertical rows");
        true
    }

    /// Freshly built rows come out in LTR order; mirror them again if needed.
    pub fn on_rebuilt(&self, surface: &mut NavigationSurface) {
        if self.applied.is_rtl() {
            mirror(surface, self.applied);
        }
    }
}

fn mirror(surface: &mut NavigationSurface, direction: LayoutDirection) {
    let gravity = if direction.is_rtl() {
        Gravity::Bottom
    } else {
        Gravity::Top
    };
    for kind in ContainerKind::ALL {
        let container = surface.container_mut(kind);
        if container.axis() != Axis::Vertical {
            continue;
        }
        container.reverse_children();
        container.set_gravity(ButtonRole::MenuRight, gravity);
        container.set_gravity(ButtonRole::ImeSwitch, gravity);
    }
}
