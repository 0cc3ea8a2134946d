//! navstrip core: the navigation strip control surface.
//!
//! Builds button rows from a user-editable action list, decides auxiliary
//! control visibility from menu policy, keyboard state and system disable
//! flags, dims the strip after inactivity, and keeps one layout per rotation
//! mirrored for the current text direction. Rendering and touch delivery
//! belong to the host.

// Re-exports from navstrip-types.
pub use navstrip_types::action;
pub use navstrip_types::color;
pub use navstrip_types::error;
pub use navstrip_types::input;
pub use navstrip_types::settings;

pub mod animation;
pub mod button;
pub mod dimmer;
pub mod disabled;
pub mod factory;
pub mod icons;
pub mod menu;
pub mod navbar;
pub mod orientation;
pub mod store;
pub mod surface;
pub mod toggle;

pub use navbar::{LayoutSize, NavigationBar};
