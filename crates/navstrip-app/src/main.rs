//! navstrip host entry point.
//!
//! Loads strip settings from a TOML file (first CLI argument or the
//! `NAVSTRIP_SETTINGS` env var, defaults otherwise), attaches an in-memory
//! store, and drives a scripted session: rotation, RTL, disable flags,
//! keyboard hints, touches and idle dimming. The diagnostic dump is printed
//! after each step.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use navstrip_core::NavigationBar;
use navstrip_core::action::ActionSpec;
use navstrip_core::disabled::{DisableFlags, NavigationHints};
use navstrip_core::icons::StaticIconResolver;
use navstrip_core::input::{LayoutDirection, Rotation, TouchEvent, TouchTarget};
use navstrip_core::settings::NavSettings;
use navstrip_core::store::{MemoryStore, SettingKey, SettingsStore};
use navstrip_core::toggle::NavBarToggle;

/// Frame interval for the simulated clock.
const FRAME_MS: u32 = 16;

/// Display rotation indexes as the platform reports them.
const ROTATION_90: u32 = 1;
const ROTATION_0: u32 = 0;

fn load_settings() -> Result<NavSettings> {
    let path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("NAVSTRIP_SETTINGS").ok())
        .map(PathBuf::from);
    match path {
        Some(path) => {
            let settings = NavSettings::load(&path)
                .with_context(|| format!("loading settings from {}", path.display()))?;
            log::info!("Loaded settings from {}", path.display());
            Ok(settings)
        },
        None => {
            log::info!("No settings file given, using defaults");
            Ok(NavSettings::default())
        },
    }
}

fn run_frames(bar: &mut NavigationBar, total_ms: u32) {
    let mut elapsed = 0;
    while elapsed < total_ms {
        let dt = FRAME_MS.min(total_ms - elapsed);
        bar.tick(dt);
        elapsed += dt;
    }
}

fn step(bar: &NavigationBar, label: &str) {
    println!("== {label}");
    print!("{}", bar.dump());
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = load_settings()?;
    log::info!(
        "Starting navstrip session ({} configured buttons)",
        settings.resolved_actions().len()
    );

    let store = MemoryStore::new(settings.clone());
    let resolver = StaticIconResolver::new().with_app_icon("app:camera", "camera_launcher");
    let mut bar = NavigationBar::new(settings, Box::new(resolver));
    bar.set_vertical_listener(|vertical| log::info!("Strip is now vertical={vertical}"));
    bar.attach(Arc::new(store.clone()));
    step(&bar, "initial");

    bar.set_show_menu(true, false);
    step(&bar, "menu requested");

    bar.set_navigation_hints(NavigationHints::IME_SHOWN | NavigationHints::BACK_ALT, false);
    step(&bar, "keyboard shown");
    bar.set_navigation_hints(NavigationHints::empty(), false);

    bar.on_rotate(Rotation::from_index(ROTATION_90));
    bar.on_text_direction_changed(LayoutDirection::Rtl);
    step(&bar, "rotated 90, rtl");

    bar.on_rotate(Rotation::from_index(ROTATION_0));
    bar.set_disabled_flags((DisableFlags::HOME | DisableFlags::RECENT).bits(), false);
    step(&bar, "home and recents disabled");
    bar.set_disabled_flags(0, false);

    store.put(SettingKey::Actions, &mut |s| {
        s.actions_json = None;
        s.actions.push(ActionSpec::new("app:camera"));
    });
    store.put(SettingKey::Dim, &mut |s| {
        s.dim.enabled = true;
        s.dim.animate = true;
    });
    bar.pump_settings();
    step(&bar, "custom button added, dimming on");

    let timeout = bar.dim_state().timeout_ms;
    let fade = bar.dim_state().animate_duration_ms;
    run_frames(&mut bar, timeout + fade / 2);
    step(&bar, "fading");
    run_frames(&mut bar, fade);
    step(&bar, "dimmed");

    bar.on_touch(TouchEvent::Down { x: 40, y: 20 }, TouchTarget::ButtonRow);
    step(&bar, "touched");

    bar.notify_screen_on(false);
    bar.notify_screen_on(true);
    step(&bar, "screen cycled");

    let mut toggle = NavBarToggle::new(Arc::new(store.clone()));
    toggle.set_listening(true);
    toggle.handle_click();
    toggle.refresh();
    log::info!(
        "Quick toggle: enabled={} long-press -> {}",
        toggle.is_enabled(),
        toggle.handle_long_click()
    );
    toggle.set_listening(false);

    bar.detach();
    log::info!("Session finished");
    Ok(())
}
