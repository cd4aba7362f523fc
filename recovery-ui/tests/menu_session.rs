//! Full menu sessions: replayed raw input through the input loop to a
//! consumer waiting on the key queue.

// Links the executor the timer driver expects alongside it
use embassy_executor as _;
use embassy_futures::block_on;
use embassy_futures::join::join;

use recovery_core::config::UiConfig;
use recovery_core::menu::MenuAction;
use recovery_core::policy::PanelPolicy;
use recovery_display_fb::FbRenderer;
use recovery_protocol::codes::{KEY_DOWN, KEY_ENTER, KEY_UP};
use recovery_protocol::UiEvent;
use recovery_ui::sim::ReplayInput;
use recovery_ui::tasks::{run_animator, run_input};
use recovery_ui::RecoveryUi;

type Ui = RecoveryUi<FbRenderer, PanelPolicy>;

fn noop() {}

fn ui_with(config: UiConfig) -> Ui {
    let renderer = FbRenderer::new(config.screen.width as u32, config.screen.height as u32);
    let policy = PanelPolicy::new(&config, noop as fn());
    RecoveryUi::new(renderer, policy, config)
}

/// Consume events until an item is chosen, then stop the UI
async fn choose(ui: &Ui) -> usize {
    let mut selected = 0;
    let chosen = loop {
        let key = ui.wait_key().await;
        let action = match key.event {
            UiEvent::Key(KEY_DOWN) => MenuAction::HighlightDown,
            UiEvent::Key(KEY_UP) => MenuAction::HighlightUp,
            UiEvent::Key(KEY_ENTER) => MenuAction::SelectItem,
            UiEvent::Tap(_) | UiEvent::ScrollUp(_) | UiEvent::ScrollDown(_) => {
                ui.handle_touch(&key.event).await
            }
            _ => MenuAction::NoAction,
        };
        match action {
            MenuAction::HighlightDown => selected = ui.menu_select(selected + 1).await,
            MenuAction::HighlightUp => selected = ui.menu_select(selected - 1).await,
            MenuAction::SelectItem => break selected as usize,
            MenuAction::Select(item) => break item,
            _ => {}
        }
    };
    ui.end_menu().await;
    ui.shutdown();
    chosen
}

#[test]
fn test_key_driven_session() {
    let ui = ui_with(UiConfig::default());
    let mut input = ReplayInput::new();
    input.key_stroke(KEY_DOWN);
    input.key_stroke(KEY_DOWN);
    input.key_stroke(KEY_UP);
    input.key_stroke(KEY_DOWN);
    input.key_stroke(KEY_ENTER);

    let (_, chosen) = block_on(async {
        ui.init().await;
        ui.start_menu(&["Main menu"], &["reboot", "install", "wipe", "advanced"], 0)
            .await;
        join(run_input(&ui, &mut input), choose(&ui)).await
    });

    assert_eq!(chosen, 2);
    assert_eq!(input.remaining(), 0);
    assert!(!ui.is_running());
    // Releases update the held-key table only
    assert!(!ui.key_pressed(KEY_ENTER));
    assert!(ui.keys().is_empty());
}

#[test]
fn test_touch_driven_session() {
    let mut config = UiConfig::default();
    // Panel already reports screen coordinates
    config.touch.max_x = 0;
    config.touch.max_y = 0;
    let ui = ui_with(config);

    let mut input = ReplayInput::new();
    input.touch(0, 600, 190, 40);
    input.touch(0, 600, 190, 0);

    let (_, chosen) = block_on(async {
        ui.init().await;
        ui.show_text(true).await;
        ui.start_menu(&[], &["a", "b", "c", "d"], 0).await;
        join(run_input(&ui, &mut input), choose(&ui)).await
    });

    // Right column, second band
    assert_eq!(chosen, 3);
    // The menu is gone: selection requests pass through unchanged
    assert_eq!(block_on(ui.menu_select(7)), 7);
}

#[test]
fn test_closed_device_stops_input() {
    let ui = ui_with(UiConfig::default());
    let mut input = ReplayInput::new().close_when_empty();
    input.key_stroke(KEY_DOWN);

    block_on(run_input(&ui, &mut input));

    // The loop returned on its own; the UI itself keeps running
    assert!(ui.is_running());
    assert_eq!(ui.keys().len(), 1);
}

#[test]
fn test_animator_stops_after_shutdown() {
    let ui = ui_with(UiConfig::default());
    block_on(async {
        ui.init().await;
        ui.show_indeterminate_progress().await;
        join(run_animator(&ui), async {
            embassy_time::Timer::after(ui.refresh_period() * 3).await;
            ui.shutdown();
        })
        .await;
    });
    assert!(!ui.is_running());
}
