//! Button factory: turns the configured action list into a strip row.
//!
//! One pass produces one container's row. The row is framed by the fixed
//! auxiliary keys:
//!
//! ```text
//! MenuLeft ImeLeft EmptyLeft | actions... | MenuRight ImeRight ImeSwitch EmptyRight
//! ```
//!
//! Vertical rows prepend every child, so their order is the reverse of the
//! horizontal row.

use navstrip_types::action::{
    ACTION_BACK, ACTION_HOME, ACTION_IME, ACTION_IME_NAVIGATION_DOWN, ACTION_IME_NAVIGATION_LEFT,
    ACTION_IME_NAVIGATION_RIGHT, ACTION_IME_NAVIGATION_UP, ACTION_MENU, ACTION_NULL,
    ACTION_RECENTS, ActionSpec, ICON_EMPTY,
};
use navstrip_types::color::Color;
use navstrip_types::settings::TintMode;

use crate::button::{
    ButtonElement, ButtonIdList, ButtonRole, IdGenerator, LightsOutDot, Padding, ScaleType,
    Visibility,
};
use crate::icons::IconResolver;
use crate::surface::Axis;

/// Color policy shared by every element of a rebuild.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButtonStyle {
    pub base_color: Color,
    pub tint_mode: TintMode,
    pub ripple: Option<Color>,
}

impl Default for ButtonStyle {
    fn default() -> Self {
        Self {
            base_color: Color::WHITE,
            tint_mode: TintMode::Always,
            ripple: None,
        }
    }
}

/// Output of one factory pass.
#[derive(Debug, Clone, Default)]
pub struct BuiltRow {
    /// Row children in layout order.
    pub elements: Vec<ButtonElement>,
    /// Lights-out placeholders, parallel to `elements`.
    pub lights_out: Vec<LightsOutDot>,
    /// Generated custom ids by action slot.
    pub ids: ButtonIdList,
}

impl BuiltRow {
    fn push(&mut self, element: ButtonElement, axis: Axis) {
        let dot = LightsOutDot::for_element(&element);
        match axis {
            Axis::Horizontal => {
                self.elements.push(element);
                self.lights_out.push(dot);
            },
            Axis::Vertical => {
                self.elements.insert(0, element);
                self.lights_out.insert(0, dot);
            },
        }
    }
}

/// Builds rows from action specs.
pub struct ButtonFactory<'a> {
    resolver: &'a dyn IconResolver,
    style: ButtonStyle,
}

impl<'a> ButtonFactory<'a> {
    pub fn new(resolver: &'a dyn IconResolver, style: ButtonStyle) -> Self {
        Self { resolver, style }
    }

    /// Build one row for `axis`.
    pub fn build(&self, specs: &[ActionSpec], axis: Axis, ids: &mut IdGenerator) -> BuiltRow {
        let mut row = BuiltRow::default();

        row.push(self.auxiliary_key(ButtonRole::MenuLeft), axis);
        row.push(self.auxiliary_key(ButtonRole::ImeLeft), axis);
        row.push(self.auxiliary_key(ButtonRole::EmptyLeft), axis);

        let spaced = specs.len() == 3;
        for (slot, spec) in specs.iter().enumerate() {
            let element = self.action_key(slot, spec, axis, ids, &mut row.ids);
            row.push(element, axis);
            if spaced && slot != specs.len() - 1 {
                row.push(ButtonElement::separator(), axis);
            }
        }

        row.push(self.auxiliary_key(ButtonRole::MenuRight), axis);
        row.push(self.auxiliary_key(ButtonRole::ImeRight), axis);
        row.push(self.auxiliary_key(ButtonRole::ImeSwitch), axis);
        row.push(self.auxiliary_key(ButtonRole::EmptyRight), axis);

        log::debug!(
            "Built {axis:?} row: {} elements, {} custom",
            row.elements.len(),
            row.ids.len()
        );
        row
    }

    fn action_key(
        &self,
        slot: usize,
        spec: &ActionSpec,
        axis: Axis,
        ids: &mut IdGenerator,
        registry: &mut ButtonIdList,
    ) -> ButtonElement {
        let role = match spec.click_action.as_str() {
            ACTION_BACK => ButtonRole::Back,
            ACTION_HOME => ButtonRole::Home,
            ACTION_RECENTS => ButtonRole::Recents,
            _ => ButtonRole::Custom,
        };

        let mut key = ButtonElement::new(role);
        key.slot = Some(slot);
        key.click_action = Some(spec.click_action.clone());
        if role != ButtonRole::Home {
            // Home long-press stays with the platform.
            key.longpress_action = Some(spec.longpress_action.clone());
        }
        if role == ButtonRole::Custom {
            key.id = ids.generate();
            registry.insert(slot, key.id);
        }

        let system = spec.is_system_action();
        if system {
            key.scale = ScaleType::FitInside;
        }

        let mode = self.style.tint_mode;
        let mut colorize = true;
        if spec.has_custom_icon() && mode == TintMode::SkipCustom {
            colorize = false;
        } else if !system {
            // App shortcut showing the launcher icon.
            key.padding = match axis {
                Axis::Horizontal => Padding::APP_ICON,
                Axis::Vertical => Padding::APP_ICON.rotated(),
            };
            if mode != TintMode::Always {
                colorize = false;
            }
        }

        self.apply_icon(&mut key, &spec.click_action, &spec.icon, colorize);
        key.ripple = self.style.ripple;
        key
    }

    fn auxiliary_key(&self, role: ButtonRole) -> ButtonElement {
        let mut key = ButtonElement::new(role);
        key.scale = ScaleType::FitInside;
        key.ripple = self.style.ripple;

        let action = match role {
            ButtonRole::MenuLeft | ButtonRole::MenuRight => {
                key.longpress_action = Some(ACTION_NULL.to_string());
                key.visibility = Visibility::Collapsed;
                Some(ACTION_MENU)
            },
            ButtonRole::ImeLeft => {
                key.longpress_action = Some(ACTION_IME_NAVIGATION_UP.to_string());
                key.visibility = Visibility::Collapsed;
                Some(ACTION_IME_NAVIGATION_LEFT)
            },
            ButtonRole::ImeRight => {
                key.longpress_action = Some(ACTION_IME_NAVIGATION_DOWN.to_string());
                key.visibility = Visibility::Collapsed;
                Some(ACTION_IME_NAVIGATION_RIGHT)
            },
            ButtonRole::ImeSwitch => {
                key.visibility = Visibility::Collapsed;
                Some(ACTION_IME)
            },
            _ => {
                key.visibility = Visibility::Invisible;
                None
            },
        };

        if let Some(action) = action {
            key.click_action = Some(action.to_string());
            self.apply_icon(&mut key, action, ICON_EMPTY, true);
        }
        key
    }

    fn apply_icon(&self, key: &mut ButtonElement, action: &str, icon: &str, colorize: bool) {
        match self.resolver.resolve(action, icon) {
            Ok(image) => {
                if colorize && self.style.tint_mode != TintMode::Never {
                    key.tint = Some(self.style.base_color);
                    key.icon = Some(image.tinted(self.style.base_color));
                } else {
                    key.icon = Some(image);
                }
            },
            Err(e) => {
                log::debug!("Leaving {:?} key without image: {e}", key.role);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::icons::StaticIconResolver;

    fn build(specs: &[ActionSpec], style: ButtonStyle, axis: Axis) -> BuiltRow {
        let resolver = StaticIconResolver::new().with_app_icon("app:camera", "camera_launcher");
        let factory = ButtonFactory::new(&resolver, style);
        factory.build(specs, axis, &mut IdGenerator::new())
    }

    fn roles(row: &BuiltRow) -> Vec<ButtonRole> {
        row.elements.iter().map(|e| e.role).collect()
    }

    fn stock_three() -> Vec<ActionSpec> {
        vec![
            ActionSpec::new(ACTION_BACK),
            ActionSpec::new(ACTION_HOME),
            ActionSpec::new(ACTION_RECENTS),
        ]
    }

    #[test]
    fn three_actions_get_two_separators() {
        let row = build(&stock_three(), ButtonStyle::default(), Axis::Horizontal);
        use ButtonRole::*;
        assert_eq!(
            roles(&row),
            vec![
                MenuLeft, ImeLeft, EmptyLeft, Back, Separator, Home, Separator, Recents, MenuRight,
                ImeRight, ImeSwitch, EmptyRight,
            ]
        );
    }

    #[test]
    fn other_sizes_get_no_separators() {
        let mut specs = stock_three();
        specs.push(ActionSpec::new("app:camera"));
        let row = build(&specs, ButtonStyle::default(), Axis::Horizontal);
        assert!(!roles(&row).contains(&ButtonRole::Separator));
        let row = build(&specs[..2], ButtonStyle::default(), Axis::Horizontal);
        assert!(!roles(&row).contains(&ButtonRole::Separator));
    }

    #[test]
    fn separators_are_positional_not_content_based() {
        let specs = vec![
            ActionSpec::new("app:camera"),
            ActionSpec::new("app:camera"),
            ActionSpec::new("app:camera"),
        ];
        let row = build(&specs, ButtonStyle::default(), Axis::Horizontal);
        let seps = roles(&row).iter().filter(|r| **r == ButtonRole::Separator).count();
        assert_eq!(seps, 2);
    }

    #[test]
    fn vertical_row_is_reversed() {
        let h = build(&stock_three(), ButtonStyle::default(), Axis::Horizontal);
        let v = build(&stock_three(), ButtonStyle::default(), Axis::Vertical);
        let mut h_roles = roles(&h);
        h_roles.reverse();
        assert_eq!(roles(&v), h_roles);
        assert_eq!(v.lights_out.len(), v.elements.len());
    }

    #[test]
    fn custom_buttons_are_registered_by_slot() {
        let specs = vec![
            ActionSpec::new("app:camera"),
            ActionSpec::new(ACTION_HOME),
            ActionSpec::new("**screenshot**"),
        ];
        let row = build(&specs, ButtonStyle::default(), Axis::Horizontal);
        let slots: Vec<usize> = row.ids.iter().map(|(s, _)| s).collect();
        assert_eq!(slots, vec![0, 2]);
        for (slot, id) in row.ids.iter() {
            let el = row.elements.iter().find(|e| e.slot == Some(slot)).unwrap();
            assert_eq!(el.id, id);
            assert_eq!(el.role, ButtonRole::Custom);
        }
    }

    #[test]
    fn home_longpress_is_never_overridden() {
        let specs = vec![
            ActionSpec::new(ACTION_HOME).with_longpress("**assist**"),
            ActionSpec::new(ACTION_BACK).with_longpress("**kill_app**"),
        ];
        let row = build(&specs, ButtonStyle::default(), Axis::Horizontal);
        let home = row.elements.iter().find(|e| e.role == ButtonRole::Home).unwrap();
        let back = row.elements.iter().find(|e| e.role == ButtonRole::Back).unwrap();
        assert_eq!(home.longpress_action, None);
        assert_eq!(back.longpress_action.as_deref(), Some("**kill_app**"));
    }

    #[test]
    fn system_actions_fit_inside() {
        let specs = vec![ActionSpec::new("**screenshot**"), ActionSpec::new("app:camera")];
        let row = build(&specs, ButtonStyle::default(), Axis::Horizontal);
        let sys = row.elements.iter().find(|e| e.slot == Some(0)).unwrap();
        let app = row.elements.iter().find(|e| e.slot == Some(1)).unwrap();
        assert_eq!(sys.scale, ScaleType::FitInside);
        assert_eq!(app.scale, ScaleType::Fill);
    }

    #[test]
    fn skip_custom_leaves_custom_icon_untinted() {
        let style = ButtonStyle {
            base_color: Color::rgb(255, 0, 0),
            tint_mode: TintMode::SkipCustom,
            ripple: None,
        };
        let specs = vec![
            ActionSpec::new(ACTION_BACK).with_icon("/sdcard/back.png"),
            ActionSpec::new(ACTION_HOME),
        ];
        let row = build(&specs, style, Axis::Horizontal);
        let back = row.elements.iter().find(|e| e.role == ButtonRole::Back).unwrap();
        let home = row.elements.iter().find(|e| e.role == ButtonRole::Home).unwrap();
        assert_eq!(back.tint, None);
        assert_eq!(back.icon.as_ref().unwrap().color, Color::WHITE);
        assert_eq!(home.tint, Some(Color::rgb(255, 0, 0)));
    }

    #[test]
    fn system_pack_icon_is_tinted_under_skip_custom() {
        let style = ButtonStyle {
            tint_mode: TintMode::SkipCustom,
            ..ButtonStyle::default()
        };
        let specs = vec![ActionSpec::new(ACTION_BACK).with_icon("system_shortcut=ic_back")];
        let row = build(&specs, style, Axis::Horizontal);
        let back = row.elements.iter().find(|e| e.role == ButtonRole::Back).unwrap();
        assert!(back.tint.is_some());
    }

    #[test]
    fn never_mode_tints_nothing() {
        let style = ButtonStyle {
            tint_mode: TintMode::Never,
            ..ButtonStyle::default()
        };
        let row = build(&stock_three(), style, Axis::Horizontal);
        assert!(row.elements.iter().all(|e| e.tint.is_none()));
    }

    #[test]
    fn app_icons_get_padding_swapped_on_vertical() {
        let specs = vec![ActionSpec::new("app:camera")];
        let h = build(&specs, ButtonStyle::default(), Axis::Horizontal);
        let v = build(&specs, ButtonStyle::default(), Axis::Vertical);
        let hp = h.elements.iter().find(|e| e.slot == Some(0)).unwrap().padding;
        let vp = v.elements.iter().find(|e| e.slot == Some(0)).unwrap().padding;
        assert_eq!(hp, Padding::APP_ICON);
        assert_eq!(vp, Padding::APP_ICON.rotated());
    }

    #[test]
    fn app_icons_untinted_unless_always() {
        let specs = vec![ActionSpec::new("app:camera")];
        let style = ButtonStyle {
            tint_mode: TintMode::SkipCustom,
            ..ButtonStyle::default()
        };
        let row = build(&specs, style, Axis::Horizontal);
        assert_eq!(row.elements.iter().find(|e| e.slot == Some(0)).unwrap().tint, None);
        let row = build(&specs, ButtonStyle::default(), Axis::Horizontal);
        assert!(row.elements.iter().find(|e| e.slot == Some(0)).unwrap().tint.is_some());
    }

    #[test]
    fn icon_failure_is_soft() {
        let resolver = StaticIconResolver::new().with_missing(ACTION_HOME);
        let factory = ButtonFactory::new(&resolver, ButtonStyle::default());
        let row = factory.build(&stock_three(), Axis::Horizontal, &mut IdGenerator::new());
        let home = row.elements.iter().find(|e| e.role == ButtonRole::Home).unwrap();
        assert!(home.icon.is_none());
        assert!(home.tint.is_none());
        assert!(home.is_visible());
    }

    #[test]
    fn empty_list_still_has_auxiliary_keys() {
        let row = build(&[], ButtonStyle::default(), Axis::Horizontal);
        assert_eq!(row.elements.len(), 7);
        assert!(row.ids.is_empty());
    }

    #[test]
    fn auxiliary_keys_start_hidden() {
        let row = build(&stock_three(), ButtonStyle::default(), Axis::Horizontal);
        for el in row.elements.iter().filter(|e| e.role.is_auxiliary()) {
            let expected = match el.role {
                ButtonRole::EmptyLeft | ButtonRole::EmptyRight => Visibility::Invisible,
                _ => Visibility::Collapsed,
            };
            assert_eq!(el.visibility, expected, "{:?}", el.role);
        }
    }

    #[test]
    fn ripple_applied_everywhere() {
        let style = ButtonStyle {
            ripple: Some(Color::rgb(1, 2, 3)),
            ..ButtonStyle::default()
        };
        let row = build(&stock_three(), style, Axis::Horizontal);
        assert!(
            row.elements
                .iter()
                .filter(|e| e.role != ButtonRole::Separator)
                .all(|e| e.ripple == Some(Color::rgb(1, 2, 3)))
        );
    }
}
