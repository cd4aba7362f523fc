//! Recovery UI simulator
//!
//! Runs the full UI on the in-memory framebuffer. Input comes from a
//! captured evdev stream (`RECOVERY_UI_CAPTURE`) or, without one, from a
//! short scripted session. The main menu is driven the way a recovery
//! consumer would: keys move the highlight, touch gestures are resolved
//! against the menu and choosing "reboot system now" ends the session.

use std::env;
use std::process;

use embassy_executor::Spawner;
use embassy_time::Timer;
use static_cell::StaticCell;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use recovery_core::config::UiConfig;
use recovery_core::menu::MenuAction;
use recovery_core::policy::PanelPolicy;
use recovery_display::{Background, Color};
use recovery_display_fb::FbRenderer;
use recovery_protocol::codes::{
    KEY_BACK, KEY_DOWN, KEY_ENTER, KEY_HOME, KEY_POWER, KEY_UP, KEY_VOLUMEDOWN, KEY_VOLUMEUP,
};
use recovery_protocol::{RecordLayout, UiEvent};
use recovery_ui::config::load_config;
use recovery_ui::sim::ReplayInput;
use recovery_ui::tasks::{run_animator, run_input};
use recovery_ui::{ui_print, RecoveryUi};

type Ui = RecoveryUi<FbRenderer, PanelPolicy>;

/// Configuration file, overridable through `RECOVERY_UI_CONFIG`
const DEFAULT_CONFIG_PATH: &str = "/etc/recovery-ui.toml";

const MENU_HEADERS: [&str; 2] = ["Recovery UI simulator", ""];

const MENU_ITEMS: [&str; 8] = [
    "reboot system now",
    "install zip from sdcard",
    "install zip from sideload",
    "wipe data/factory reset",
    "wipe cache partition",
    "backup and restore",
    "mounts and storage",
    "advanced",
];

const ITEM_REBOOT: usize = 0;

/// Placeholder artwork: name, width, height, color
const PLACEHOLDERS: [(&str, u32, u32, Color); 12] = [
    ("icon_installing", 200, 200, Color::rgba(0, 120, 200, 255)),
    ("icon_error", 200, 200, Color::rgba(200, 40, 40, 255)),
    ("icon_back", 192, 100, Color::rgba(60, 60, 60, 255)),
    ("icon_down", 192, 100, Color::rgba(60, 60, 60, 255)),
    ("icon_up", 192, 100, Color::rgba(60, 60, 60, 255)),
    ("icon_select", 192, 100, Color::rgba(60, 60, 60, 255)),
    ("button_L", 384, 120, Color::rgba(40, 40, 40, 255)),
    ("button_L_sel", 384, 120, Color::rgba(90, 30, 30, 255)),
    ("button_R", 384, 120, Color::rgba(40, 40, 40, 255)),
    ("button_R_sel", 384, 120, Color::rgba(90, 30, 30, 255)),
    ("progress_empty", 400, 16, Color::rgba(50, 50, 50, 255)),
    ("progress_fill", 400, 16, Color::rgba(0, 160, 80, 255)),
];

// Static cells for state shared with the tasks (must live forever)
static UI: StaticCell<Ui> = StaticCell::new();
static INPUT: StaticCell<ReplayInput> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();
    info!("Recovery UI simulator starting...");

    let config_path =
        env::var("RECOVERY_UI_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_owned());
    let config = load_config(&config_path);

    let renderer = build_renderer(&config);
    let policy = PanelPolicy::new(&config, reboot as fn());
    let input = INPUT.init(open_input(&config));
    let ui: &'static Ui = UI.init(RecoveryUi::new(renderer, policy, config));

    ui.init().await;
    ui.set_background(Background::Installing).await;
    ui.show_text(true).await;

    spawner.must_spawn(input_task(ui, input));
    spawner.must_spawn(animator_task(ui));
    spawner.must_spawn(recovery_task(ui));
    info!("All tasks spawned");
}

/// Framebuffer with placeholder artwork for the most visible surfaces
fn build_renderer(config: &UiConfig) -> FbRenderer {
    let mut renderer = FbRenderer::new(config.screen.width as u32, config.screen.height as u32);
    for (name, width, height, color) in PLACEHOLDERS {
        if let Err(e) = renderer.register_solid(name, width, height, color) {
            warn!("Can't register placeholder {}: {:?}", name, e);
        }
    }
    renderer
}

/// Replay a capture file, or a scripted session without one
fn open_input(config: &UiConfig) -> ReplayInput {
    if let Ok(path) = env::var("RECOVERY_UI_CAPTURE") {
        match ReplayInput::load(&path, RecordLayout::default()) {
            Ok(input) => {
                info!("Replaying {} events from {}", input.remaining(), path);
                return input.close_when_empty();
            }
            Err(e) => warn!("Can't read capture {}: {}, using script", path, e),
        }
    }
    scripted_session(config)
}

/// Walk down the menu, tap an item, then jump home and choose reboot
fn scripted_session(config: &UiConfig) -> ReplayInput {
    let mut input = ReplayInput::new();
    input.key_stroke(KEY_DOWN);
    input.key_stroke(KEY_DOWN);

    // Tap a right-column row, in native panel coordinates
    let x = config.touch.max_x as i32 * 3 / 4;
    let y = config.touch.max_y as i32 / 10;
    input.touch(0, x, y, 40);
    input.touch(0, x, y, 0);

    input.key_stroke(KEY_UP);
    input.key_stroke(KEY_HOME);
    input.key_stroke(KEY_ENTER);
    input
}

/// Reboot hook for the key combination; the simulator just exits
fn reboot() {
    warn!("Reboot requested, exiting");
    process::exit(0);
}

#[embassy_executor::task]
async fn input_task(ui: &'static Ui, device: &'static mut ReplayInput) {
    run_input(ui, device).await;
}

#[embassy_executor::task]
async fn animator_task(ui: &'static Ui) {
    run_animator(ui).await;
}

/// Main menu loop
#[embassy_executor::task]
async fn recovery_task(ui: &'static Ui) {
    info!("Recovery task started");

    let count = ui.start_menu(&MENU_HEADERS, &MENU_ITEMS, 0).await;
    let mut selected: i32 = 0;

    loop {
        let key = ui.wait_key().await;
        let action = match key.event {
            UiEvent::Key(KEY_DOWN | KEY_VOLUMEDOWN) => MenuAction::HighlightDown,
            UiEvent::Key(KEY_UP | KEY_VOLUMEUP) => MenuAction::HighlightUp,
            UiEvent::Key(KEY_ENTER | KEY_POWER) => MenuAction::SelectItem,
            UiEvent::Key(KEY_BACK) => MenuAction::GoBack,
            UiEvent::Key(KEY_HOME) => {
                selected = ui.menu_select(0).await;
                MenuAction::NoAction
            }
            UiEvent::Tap(_) | UiEvent::ScrollUp(_) | UiEvent::ScrollDown(_) => {
                ui.handle_touch(&key.event).await
            }
            _ => MenuAction::NoAction,
        };

        let chosen = match action {
            MenuAction::HighlightDown => {
                selected = ui.menu_select(selected + 1).await;
                None
            }
            MenuAction::HighlightUp => {
                selected = ui.menu_select(selected - 1).await;
                None
            }
            MenuAction::Page(selection) => {
                selected = selection as i32;
                None
            }
            MenuAction::SelectItem => Some(selected as usize),
            MenuAction::Select(item) => {
                selected = ui.menu_select(item as i32).await;
                Some(item)
            }
            MenuAction::GoBack => {
                info!("Already at the main menu");
                None
            }
            MenuAction::NoAction => None,
        };

        let Some(item) = chosen else {
            continue;
        };
        if item >= count {
            // The back row
            continue;
        }

        ui_print!(ui, "-- {}\n", MENU_ITEMS[item]).await;
        if item == ITEM_REBOOT {
            break;
        }
    }

    ui.end_menu().await;
    ui_print!(ui, "Rebooting...\n").await;
    ui.shutdown();
    info!("Recovery task stopped");

    // Let the loops notice the shutdown, then leave like a reboot would
    Timer::after(ui.refresh_period() * 2).await;
    process::exit(0);
}
