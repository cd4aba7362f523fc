//! Recovery UI runtime
//!
//! Owns the screen state and the key queue and exposes the calls the
//! recovery logic drives menus, progress and the console with.
//!
//! # Architecture
//!
//! ```text
//!  ┌──────────────┐  raw   ┌────────────┐ UiEvent ┌──────────┐  wait_key  ┌──────────┐
//!  │ InputDevice  │───────>│ input task │────────>│ KeyQueue │───────────>│ consumer │
//!  └──────────────┘        └─────┬──────┘         └──────────┘            └────┬─────┘
//!                                │ live highlight                              │ menus,
//!                                v                                             v progress
//!                         ┌─────────────┐        ┌───────────────┐
//!                         │ ScreenState │<───────│ animator task │
//!                         └─────────────┘  tick  └───────────────┘
//! ```
//!
//! Two locks exist: the async state mutex serializes every repaint with
//! the mutation that caused it, and a short blocking section guards the
//! key queue. Neither is held while taking the other.

pub mod config;
pub mod keys;
pub mod logging;
pub mod sim;
pub mod state;
pub mod tasks;

use core::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_time::{Duration, Instant};
use portable_atomic::{AtomicBool, Ordering};

use recovery_core::config::UiConfig;
use recovery_core::input::{KeyPress, NormalizedEvent, PushOutcome};
use recovery_core::menu::{Menu, MenuAction, MenuGeometry};
use recovery_display::{Background, Renderer};
use recovery_hal::DevicePolicy;
use recovery_protocol::{Touch, UiEvent};

use crate::keys::KeyQueue;
use crate::logging::{debug, error, info, warn};
use crate::state::ScreenState;

/// Raw pixels of a diagnostic screen capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u32,
    pub pixels: Vec<u8>,
}

/// The recovery UI
///
/// Shared by reference between the input task, the animator task and
/// the recovery logic for the whole session.
pub struct RecoveryUi<R, P> {
    state: Mutex<CriticalSectionRawMutex, ScreenState<R>>,
    keys: KeyQueue,
    policy: P,
    config: UiConfig,
    running: AtomicBool,
    epoch: Instant,
}

impl<R: Renderer, P: DevicePolicy> RecoveryUi<R, P> {
    pub fn new(renderer: R, policy: P, config: UiConfig) -> Self {
        Self {
            state: Mutex::new(ScreenState::new(renderer, &config)),
            keys: KeyQueue::new(),
            policy,
            config,
            running: AtomicBool::new(true),
            epoch: Instant::now(),
        }
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn keys(&self) -> &KeyQueue {
        &self.keys
    }

    /// Lock the screen state
    pub async fn state(&self) -> MutexGuard<'_, CriticalSectionRawMutex, ScreenState<R>> {
        self.state.lock().await
    }

    /// Input poll timeout and animation period
    pub fn refresh_period(&self) -> Duration {
        Duration::from_millis(self.config.refresh_period_ms())
    }

    /// False once [`RecoveryUi::shutdown`] was called
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the input and animator tasks within one refresh period
    pub fn shutdown(&self) {
        info!("UI shutdown requested");
        self.running.store(false, Ordering::Release);
    }

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis()
    }

    /// Load the artwork and draw the first frame
    pub async fn init(&self) {
        let mut state = self.state.lock().await;
        state.initialize(&self.config);
        info!(
            "UI initialized: {}x{}, {} console rows",
            state.renderer.width(),
            state.renderer.height(),
            state.log.rows()
        );
        state.update_screen();
    }

    pub async fn set_background(&self, background: Background) {
        let mut state = self.state.lock().await;
        state.background = background;
        state.update_screen();
    }

    /// Diagnostic capture of `background` drawn alone
    ///
    /// Returns `None` when the pixel buffer cannot be allocated.
    pub async fn copy_image(&self, background: Background) -> Option<Snapshot> {
        let mut state = self.state.lock().await;
        state.draw_background(background);

        let framebuffer = state.renderer.framebuffer();
        let mut pixels = Vec::new();
        if pixels.try_reserve_exact(framebuffer.len()).is_err() {
            error!("Can't allocate {} bytes for image", framebuffer.len());
            return None;
        }
        pixels.extend_from_slice(framebuffer);

        Some(Snapshot {
            width: state.renderer.width(),
            height: state.renderer.height(),
            bits_per_pixel: state.renderer.bits_per_pixel(),
            pixels,
        })
    }

    // Progress

    pub async fn show_indeterminate_progress(&self) {
        let mut state = self.state.lock().await;
        if state.progress.show_indeterminate() {
            state.update_progress();
        }
    }

    /// Start a progress scope covering `portion` of the bar
    ///
    /// With `seconds > 0` the bar fills on its own over that time.
    pub async fn show_progress(&self, portion: f32, seconds: u32) {
        let now = self.now_ms();
        let mut state = self.state.lock().await;
        state.progress.begin_scope(portion, seconds, now);
        state.update_progress();
    }

    /// Set progress within the current scope
    pub async fn set_progress(&self, fraction: f32) {
        let mut state = self.state.lock().await;
        let bar_width = state.bar_width();
        if state.progress.set_fraction(fraction, bar_width) {
            state.update_progress();
        }
    }

    pub async fn reset_progress(&self) {
        let mut state = self.state.lock().await;
        state.progress.reset();
        state.update_screen();
    }

    /// One animator period
    pub async fn animate(&self) {
        let now = self.now_ms();
        let mut state = self.state.lock().await;
        let bar_width = state.bar_width();
        let overlay = state.show_text;
        if state.progress.tick(now, overlay, bar_width) {
            state.update_progress();
        }
    }

    // Console

    /// Append formatted text to the console and echo it to stdout
    pub async fn print(&self, args: fmt::Arguments<'_>) {
        print!("{}", args);
        self.append(args).await;
    }

    /// Append the last `lines` lines of a log file to the console
    ///
    /// The lines are not echoed to stdout.
    pub async fn print_log_tail(&self, path: impl AsRef<Path>, lines: usize) {
        let bytes = match fs::read(path.as_ref()) {
            Ok(bytes) => bytes,
            Err(_) => {
                warn!("Can't read log file for tail");
                return;
            }
        };
        let contents = String::from_utf8_lossy(&bytes);
        let all: Vec<&str> = contents.lines().collect();
        let tail = &all[all.len().saturating_sub(lines)..];

        let mut state = self.state.lock().await;
        for line in tail {
            state.log.push_str(line);
            state.log.push_char('\n');
        }
        state.update_screen();
    }

    /// Continue writing at the start of the current console line
    pub async fn reset_text_col(&self) {
        self.state.lock().await.log.reset_col();
    }

    async fn append(&self, args: fmt::Arguments<'_>) {
        let mut state = self.state.lock().await;
        let _ = state.log.write_fmt(args);
        state.update_screen();
    }

    // Text overlay

    pub async fn text_visible(&self) -> bool {
        self.state.lock().await.show_text
    }

    /// Show or hide the text overlay and repaint
    pub async fn show_text(&self, visible: bool) {
        let mut state = self.state.lock().await;
        state.show_text = visible;
        state.update_screen();
    }

    /// Show or hide the text overlay without repainting
    pub async fn set_show_text(&self, visible: bool) {
        self.state.lock().await.show_text = visible;
    }

    pub async fn set_show_back_button(&self, show: bool) {
        self.state.lock().await.show_back_button = show;
    }

    pub async fn show_back_button(&self) -> bool {
        self.state.lock().await.show_back_button
    }

    // Menus

    /// Show a menu; returns the number of selectable items
    pub async fn start_menu(&self, headers: &[&str], items: &[&str], initial_selection: usize) -> usize {
        let mut state = self.state.lock().await;
        let geometry = MenuGeometry::from_config(&self.config);
        let back_row = state.show_back_button;
        let menu = Menu::new(geometry, headers, items, initial_selection, back_row);
        let count = menu.item_count();
        debug!("Menu started with {} items", count);
        state.menu = Some(menu);
        state.update_screen();
        count
    }

    /// Move the menu selection
    ///
    /// Negative values count from the end and values past the end wrap.
    /// Without a menu `selection` is returned unchanged.
    pub async fn menu_select(&self, selection: i32) -> i32 {
        let mut state = self.state.lock().await;
        let Some(menu) = state.menu.as_mut() else {
            return selection;
        };
        let old = menu.selection();
        let new = menu.select(selection as isize);
        if new != old {
            state.update_screen();
        }
        new as i32
    }

    pub async fn end_menu(&self) {
        let mut state = self.state.lock().await;
        if state.menu.take().is_some() {
            state.update_screen();
        }
    }

    /// Interpret a finished touch gesture against the shown menu
    pub async fn handle_touch(&self, event: &UiEvent) -> MenuAction {
        let mut state = self.state.lock().await;
        if !state.show_text {
            return MenuAction::NoAction;
        }
        let Some(menu) = state.menu.as_mut() else {
            return MenuAction::NoAction;
        };

        let had_pressed = menu.pressed_control().is_some();
        let action = menu.handle_touch(event);
        menu.release_highlight();
        if had_pressed || matches!(action, MenuAction::Page(_)) {
            state.update_screen();
        }
        action
    }

    // Keys

    /// Wait for the next queued event
    pub async fn wait_key(&self) -> KeyPress {
        self.keys.wait().await
    }

    /// Returns true if `code` is currently held
    pub fn key_pressed(&self, code: u16) -> bool {
        self.keys.is_pressed(code)
    }

    pub fn clear_key_queue(&self) {
        self.keys.clear();
    }

    /// Route one normalized event: held-key table, queue, live feedback
    /// and device key combinations
    pub async fn dispatch(&self, normalized: NormalizedEvent) {
        let NormalizedEvent { event, value, .. } = normalized;

        if normalized.should_record() {
            if let Some(code) = event.key_code() {
                self.keys.record(code, value);
            }
        }
        if !normalized.should_queue() {
            return;
        }

        let pushed = self.keys.push(event);
        if pushed.outcome == PushOutcome::Dropped {
            warn!("Key queue full, dropping event");
        }

        if let UiEvent::Down(touch) | UiEvent::Move(touch) = event {
            self.live_feedback(&touch, pushed.seq).await;
        }

        if let Some(code) = event.key_code() {
            if self.keys.with_pressed(|keys| self.policy.toggle_display(keys, code)) {
                let mut state = self.state.lock().await;
                state.show_text = !state.show_text;
                info!("Display toggled, text visible: {}", state.show_text);
                state.update_screen();
            }
            if self.keys.with_pressed(|keys| self.policy.reboot_now(keys, code)) {
                warn!("Reboot key combination pressed");
                self.policy.reboot();
            }
        }
    }

    /// Highlight the row or control under a held touch
    async fn live_feedback(&self, touch: &Touch, seq: u32) {
        if touch.pressure <= 0 {
            return;
        }
        let mut state = self.state.lock().await;
        let Some(menu) = state.menu.as_mut() else {
            return;
        };
        if menu.highlight_at(touch) {
            state.update_screen();
        }
        self.keys.mark_feedback(seq);
    }
}

/// Append formatted text to the UI console, like `print!`
#[macro_export]
macro_rules! ui_print {
    ($ui:expr, $($arg:tt)*) => {
        $ui.print(format_args!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use embassy_futures::block_on;
    use recovery_core::policy::PanelPolicy;
    use recovery_display_fb::FbRenderer;
    use recovery_protocol::codes::{KEY_DOWN, KEY_POWER, KEY_VOLUMEUP};

    type TestUi = RecoveryUi<FbRenderer, PanelPolicy>;

    fn noop() {}

    fn ui_with(config: UiConfig) -> TestUi {
        let renderer = FbRenderer::new(config.screen.width as u32, config.screen.height as u32);
        let policy = PanelPolicy::new(&config, noop as fn());
        RecoveryUi::new(renderer, policy, config)
    }

    fn ui() -> TestUi {
        ui_with(UiConfig::default())
    }

    fn key(code: u16, value: i32) -> NormalizedEvent {
        NormalizedEvent {
            event: UiEvent::Key(code),
            value,
            synthetic: false,
        }
    }

    fn touch_event(event: fn(Touch) -> UiEvent, x: i32, y: i32, pressure: i32) -> NormalizedEvent {
        NormalizedEvent {
            event: event(Touch {
                x,
                y,
                pressure,
                ..Touch::default()
            }),
            value: 1,
            synthetic: true,
        }
    }

    #[test]
    fn test_menu_select_wraps() {
        block_on(async {
            let ui = ui();
            ui.init().await;
            let items = ["0", "1", "2", "3", "4", "5", "6", "7", "8"];
            assert_eq!(ui.start_menu(&["Header"], &items, 0).await, 9);
            assert_eq!(ui.menu_select(-1).await, 8);
            assert_eq!(ui.menu_select(11).await, 2);
            ui.end_menu().await;
            assert_eq!(ui.menu_select(5).await, 5);
        });
    }

    #[test]
    fn test_back_row_not_counted() {
        block_on(async {
            let ui = ui();
            ui.set_show_back_button(true).await;
            assert!(ui.show_back_button().await);
            assert_eq!(ui.start_menu(&[], &["a", "b"], 0).await, 2);
            // The back row is still selectable
            assert_eq!(ui.menu_select(-1).await, 2);
        });
    }

    #[test]
    fn test_key_release_recorded_not_queued() {
        block_on(async {
            let ui = ui();
            ui.dispatch(key(KEY_DOWN, 1)).await;
            assert!(ui.key_pressed(KEY_DOWN));
            ui.dispatch(key(KEY_DOWN, 0)).await;
            assert!(!ui.key_pressed(KEY_DOWN));
            assert_eq!(ui.keys().len(), 1);

            let key = ui.wait_key().await;
            assert_eq!(key.event, UiEvent::Key(KEY_DOWN));
            ui.clear_key_queue();
        });
    }

    #[test]
    fn test_display_toggle_combo() {
        let mut config = UiConfig::default();
        config.combos.toggle_display.push(KEY_VOLUMEUP).unwrap();
        config.combos.toggle_display.push(KEY_POWER).unwrap();

        block_on(async {
            let ui = ui_with(config);
            ui.init().await;
            assert!(!ui.text_visible().await);
            ui.dispatch(key(KEY_VOLUMEUP, 1)).await;
            assert!(!ui.text_visible().await);
            ui.dispatch(key(KEY_POWER, 1)).await;
            assert!(ui.text_visible().await);
        });
    }

    #[test]
    fn test_reboot_combo_calls_policy() {
        let mut config = UiConfig::default();
        config.combos.reboot.push(KEY_VOLUMEUP).unwrap();
        config.combos.reboot.push(KEY_POWER).unwrap();
        let rebooted = Cell::new(false);
        let policy = PanelPolicy::new(&config, || rebooted.set(true));
        let ui = RecoveryUi::new(FbRenderer::new(768, 1280), policy, config);

        block_on(async {
            ui.dispatch(key(KEY_POWER, 1)).await;
            assert!(!rebooted.get());
            ui.dispatch(key(KEY_POWER, 0)).await;
            ui.dispatch(key(KEY_VOLUMEUP, 1)).await;
            assert!(!rebooted.get());
            ui.dispatch(key(KEY_POWER, 1)).await;
        });
        assert!(rebooted.get());
    }

    #[test]
    fn test_live_feedback_moves_selection() {
        block_on(async {
            let ui = ui();
            ui.init().await;
            ui.show_text(true).await;
            ui.start_menu(&[], &["a", "b", "c", "d"], 0).await;

            // Right column, second band: item 3
            ui.dispatch(touch_event(UiEvent::Down, 600, 190, 40)).await;
            assert_eq!(ui.state().await.menu.as_ref().unwrap().selection(), 3);

            // Release right after feedback
            ui.dispatch(touch_event(UiEvent::Tap, 600, 190, 40)).await;
            let down = ui.wait_key().await;
            assert!(matches!(down.event, UiEvent::Down(_)));
            let tap = ui.wait_key().await;
            assert!(tap.after_feedback);
            assert_eq!(ui.handle_touch(&tap.event).await, MenuAction::Select(3));
        });
    }

    #[test]
    fn test_handle_touch_needs_overlay() {
        block_on(async {
            let ui = ui();
            ui.start_menu(&[], &["a"], 0).await;
            let tap = UiEvent::Tap(Touch {
                x: 100,
                y: 30,
                ..Touch::default()
            });
            assert_eq!(ui.handle_touch(&tap).await, MenuAction::NoAction);
            ui.set_show_text(true).await;
            assert_eq!(ui.handle_touch(&tap).await, MenuAction::Select(0));
        });
    }

    #[test]
    fn test_print_appends_to_console() {
        block_on(async {
            let ui = ui();
            ui_print!(ui, "Installing {}\n", "update.zip").await;
            let state = ui.state().await;
            assert!(state.log.lines().any(|line| line == "Installing update.zip"));
        });
    }

    #[test]
    fn test_log_tail_keeps_invalid_bytes() {
        let path = std::env::temp_dir().join(format!("recovery-ui-tail-{}.log", std::process::id()));
        fs::write(&path, b"first\nsecond \xff\xfe line\nthird\n").unwrap();

        block_on(async {
            let ui = ui();
            ui.print_log_tail(&path, 2).await;
            let state = ui.state().await;
            let lines: Vec<&str> = state.log.lines().collect();
            assert!(lines.contains(&"second \u{fffd}\u{fffd} line"));
            assert!(lines.contains(&"third"));
            assert!(!lines.contains(&"first"));
        });
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_copy_image() {
        block_on(async {
            let ui = ui();
            ui.init().await;
            let snapshot = ui.copy_image(Background::Error).await.unwrap();
            assert_eq!((snapshot.width, snapshot.height), (768, 1280));
            assert_eq!(snapshot.bits_per_pixel, 32);
            assert_eq!(snapshot.pixels.len(), 768 * 1280 * 4);
        });
    }

    #[test]
    fn test_progress_calls() {
        block_on(async {
            let ui = ui();
            ui.init().await;
            ui.show_progress(0.5, 0).await;
            ui.set_progress(0.5).await;
            {
                let state = ui.state().await;
                assert_eq!(state.progress.fill_width(400), 100);
            }
            ui.show_indeterminate_progress().await;
            ui.reset_progress().await;
            let state = ui.state().await;
            assert_eq!(state.progress.fill_width(400), 0);
        });
    }

    #[test]
    fn test_shutdown() {
        let ui = ui();
        assert!(ui.is_running());
        ui.shutdown();
        assert!(!ui.is_running());
    }
}
