//! Strip elements: buttons, auxiliary keys, separators.

use std::collections::BTreeMap;
use std::fmt;

use navstrip_types::color::{Color, multiply};

/// Identity of a strip element.
///
/// Fixed roles carry a stable well-known id. Custom buttons get a fresh id
/// from [`IdGenerator`] on every rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ButtonId(pub u32);

impl ButtonId {
    /// Elements without identity (separators).
    pub const NONE: Self = Self(0);
    pub const BACK: Self = Self(1);
    pub const HOME: Self = Self(2);
    pub const RECENTS: Self = Self(3);
    pub const MENU_LEFT: Self = Self(4);
    pub const MENU_RIGHT: Self = Self(5);
    pub const IME_LEFT: Self = Self(6);
    pub const IME_RIGHT: Self = Self(7);
    pub const IME_SWITCH: Self = Self(8);
    pub const EMPTY_LEFT: Self = Self(9);
    pub const EMPTY_RIGHT: Self = Self(10);
}

impl fmt::Display for ButtonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// Hands out custom button ids. Never reused for the lifetime of the bar.
#[derive(Debug)]
pub struct IdGenerator {
    next: u32,
}

impl IdGenerator {
    /// First generated id; below this are the well-known ids.
    pub const FIRST: u32 = 0x1000;

    pub fn new() -> Self {
        Self { next: Self::FIRST }
    }

    pub fn generate(&mut self) -> ButtonId {
        let id = ButtonId(self.next);
        self.next = self.next.wrapping_add(1).max(Self::FIRST);
        id
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// What an element is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonRole {
    Back,
    Home,
    Recents,
    Custom,
    MenuLeft,
    MenuRight,
    ImeLeft,
    ImeRight,
    ImeSwitch,
    EmptyLeft,
    EmptyRight,
    Separator,
}

impl ButtonRole {
    /// The seven auxiliary controls, in menu state machine order.
    pub const AUXILIARY: [ButtonRole; 7] = [
        ButtonRole::EmptyLeft,
        ButtonRole::EmptyRight,
        ButtonRole::MenuLeft,
        ButtonRole::ImeLeft,
        ButtonRole::MenuRight,
        ButtonRole::ImeRight,
        ButtonRole::ImeSwitch,
    ];

    /// Well-known id for fixed roles.
    pub fn fixed_id(self) -> Option<ButtonId> {
        match self {
            Self::Back => Some(ButtonId::BACK),
            Self::Home => Some(ButtonId::HOME),
            Self::Recents => Some(ButtonId::RECENTS),
            Self::MenuLeft => Some(ButtonId::MENU_LEFT),
            Self::MenuRight => Some(ButtonId::MENU_RIGHT),
            Self::ImeLeft => Some(ButtonId::IME_LEFT),
            Self::ImeRight => Some(ButtonId::IME_RIGHT),
            Self::ImeSwitch => Some(ButtonId::IME_SWITCH),
            Self::EmptyLeft => Some(ButtonId::EMPTY_LEFT),
            Self::EmptyRight => Some(ButtonId::EMPTY_RIGHT),
            Self::Custom | Self::Separator => None,
        }
    }

    pub fn is_auxiliary(self) -> bool {
        Self::AUXILIARY.contains(&self)
    }

    /// Short label used by the diagnostic dump.
    pub fn label(self) -> &'static str {
        match self {
            Self::Back => "back",
            Self::Home => "home",
            Self::Recents => "rcnt",
            Self::Custom => "custom",
            Self::MenuLeft => "leftMenu",
            Self::MenuRight => "rightMenu",
            Self::ImeLeft => "imeLeft",
            Self::ImeRight => "imeRight",
            Self::ImeSwitch => "imeSwitch",
            Self::EmptyLeft => "emptyLeft",
            Self::EmptyRight => "emptyRight",
            Self::Separator => "separator",
        }
    }
}

/// Element visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Drawn and occupying space.
    Visible,
    /// Not drawn but still occupying space.
    Invisible,
    /// Removed from layout flow.
    Collapsed,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Visible => write!(f, "VISIBLE"),
            Self::Invisible => write!(f, "INVISIBLE"),
            Self::Collapsed => write!(f, "GONE"),
        }
    }
}

/// How the icon is scaled into the key bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleType {
    Fill,
    FitInside,
}

/// Alignment across the row axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gravity {
    #[default]
    Center,
    Top,
    Bottom,
}

/// Relative padding in dp (`start`/`end` follow text direction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Padding {
    pub start: u16,
    pub top: u16,
    pub end: u16,
    pub bottom: u16,
}

impl Padding {
    pub const ZERO: Self = Self {
        start: 0,
        top: 0,
        end: 0,
        bottom: 0,
    };

    /// Padding around app icons on horizontal rows.
    pub const APP_ICON: Self = Self {
        start: 2,
        top: 4,
        end: 2,
        bottom: 5,
    };

    /// Rotate a quarter turn for vertical rows.
    pub fn rotated(self) -> Self {
        Self {
            start: self.top,
            top: self.start,
            end: self.bottom,
            bottom: self.end,
        }
    }
}

/// A resolved icon.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    /// Resource the icon was loaded from.
    pub resource: String,
    /// Base color of the icon pixels, after any tint.
    pub color: Color,
    /// Back icon drawn in its "dismiss keyboard" form.
    pub ime_visible: bool,
}

impl Image {
    pub fn new(resource: &str) -> Self {
        Self {
            resource: resource.to_string(),
            color: Color::WHITE,
            ime_visible: false,
        }
    }

    /// Apply a multiply tint.
    pub fn tinted(mut self, tint: Color) -> Self {
        self.color = multiply(self.color, tint);
        self
    }
}

/// One element of a strip row.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonElement {
    pub id: ButtonId,
    pub role: ButtonRole,
    /// Index into the configured action list, for configured buttons.
    pub slot: Option<usize>,
    pub click_action: Option<String>,
    pub longpress_action: Option<String>,
    pub visibility: Visibility,
    pub icon: Option<Image>,
    pub tint: Option<Color>,
    pub scale: ScaleType,
    pub padding: Padding,
    pub gravity: Gravity,
    pub ripple: Option<Color>,
}

impl ButtonElement {
    /// A bare element of `role` with its fixed id (or [`ButtonId::NONE`]).
    pub fn new(role: ButtonRole) -> Self {
        Self {
            id: role.fixed_id().unwrap_or(ButtonId::NONE),
            role,
            slot: None,
            click_action: None,
            longpress_action: None,
            visibility: Visibility::Visible,
            icon: None,
            tint: None,
            scale: ScaleType::Fill,
            padding: Padding::ZERO,
            gravity: Gravity::Center,
            ripple: None,
        }
    }

    /// Neutral spacer placed between buttons of small sets.
    pub fn separator() -> Self {
        Self::new(ButtonRole::Separator)
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }
}

/// Ordered registry of generated custom button ids, keyed by action slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonIdList {
    ids: BTreeMap<usize, ButtonId>,
}

impl ButtonIdList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, slot: usize, id: ButtonId) {
        self.ids.insert(slot, id);
    }

    /// Ids in slot order.
    pub fn ids(&self) -> impl Iterator<Item = ButtonId> + '_ {
        self.ids.values().copied()
    }

    /// `(slot, id)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, ButtonId)> + '_ {
        self.ids.iter().map(|(slot, id)| (*slot, *id))
    }

    pub fn get(&self, slot: usize) -> Option<ButtonId> {
        self.ids.get(&slot).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Low-profile placeholder kept parallel to each row element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LightsOutDot {
    /// Large dot for auxiliary slots, small for configured buttons.
    pub large: bool,
    pub visibility: Visibility,
}

impl LightsOutDot {
    pub fn for_element(element: &ButtonElement) -> Self {
        let placeholder = element.slot.is_none();
        Self {
            large: placeholder,
            visibility: if placeholder {
                Visibility::Invisible
            } else {
                Visibility::Visible
            },
        }
    }
}
