//! Drawable UI state
//!
//! Everything the screen shows lives here and is only touched with the
//! state lock held. Mutators change the state and then repaint through
//! [`ScreenState::update_screen`] or [`ScreenState::update_progress`]
//! before the lock is released.

use recovery_core::config::UiConfig;
use recovery_core::console::TextLog;
use recovery_core::menu::Menu;
use recovery_core::progress::Progress;
use recovery_display::{Background, Compositor, IconSet, Renderer, Scene};

use crate::logging::warn;

pub struct ScreenState<R> {
    pub(crate) renderer: R,
    pub(crate) compositor: Compositor,
    /// Repaints are skipped until the icons are loaded
    pub(crate) initialized: bool,
    pub(crate) background: Background,
    pub(crate) progress: Progress,
    pub(crate) menu: Option<Menu>,
    pub(crate) log: TextLog,
    pub(crate) show_text: bool,
    /// The drawing buffer matches the last full redraw outside the
    /// progress region
    pub(crate) pages_identical: bool,
    pub(crate) show_back_button: bool,
}

impl<R: Renderer> ScreenState<R> {
    pub fn new(renderer: R, config: &UiConfig) -> Self {
        Self {
            renderer,
            compositor: Compositor::new(IconSet::empty(), config.font.char_height as i32),
            initialized: false,
            background: Background::None,
            progress: Progress::new(),
            menu: None,
            log: TextLog::from_config(config),
            show_text: false,
            pages_identical: false,
            show_back_button: config.menu.show_back_button,
        }
    }

    /// Load the icon set and allow repaints
    pub fn initialize(&mut self, config: &UiConfig) {
        let (icons, missing) = IconSet::load(&mut self.renderer);
        for name in &missing {
            warn!("Missing surface {}", *name);
        }
        self.compositor = Compositor::new(icons, config.font.char_height as i32);
        self.initialized = true;
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Progress bar width in pixels
    pub fn bar_width(&self) -> u32 {
        self.compositor.bar_size(&self.renderer).0
    }

    /// Redraw everything and flip
    pub fn update_screen(&mut self) {
        if !self.initialized {
            return;
        }
        self.draw_screen();
        self.pages_identical = false;
        self.renderer.flip();
    }

    /// Redraw the progress bar, or everything when that is not enough
    pub fn update_progress(&mut self) {
        if !self.initialized {
            return;
        }
        if self.show_text || !self.pages_identical {
            self.draw_screen();
            self.pages_identical = true;
        } else {
            self.compositor.draw_progress(&mut self.renderer, &self.progress);
        }
        self.renderer.flip();
    }

    /// Paint a background alone into the drawing buffer
    pub fn draw_background(&mut self, background: Background) {
        self.compositor.draw_background(&mut self.renderer, background);
        self.pages_identical = false;
    }

    fn draw_screen(&mut self) {
        let scene = Scene {
            background: self.background,
            progress: &self.progress,
            show_text: self.show_text,
            menu: self.menu.as_ref(),
            log: &self.log,
        };
        self.compositor.draw_screen(&mut self.renderer, &scene);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recovery_display_fb::FbRenderer;

    fn state() -> ScreenState<FbRenderer> {
        let config = UiConfig::default();
        ScreenState::new(FbRenderer::new(768, 1280), &config)
    }

    #[test]
    fn test_no_repaint_before_init() {
        let mut state = state();
        state.update_screen();
        state.update_progress();
        assert_eq!(state.renderer().flips(), 0);
    }

    #[test]
    fn test_progress_only_repaint_after_full() {
        let mut state = state();
        state.initialize(&UiConfig::default());
        state.progress.begin_scope(1.0, 0, 0);

        state.update_screen();
        assert!(!state.pages_identical);
        state.update_progress();
        assert!(state.pages_identical);
        state.update_progress();
        assert!(state.pages_identical);
        assert_eq!(state.renderer().flips(), 3);
    }

    #[test]
    fn test_fallback_bar_width() {
        let mut state = state();
        state.initialize(&UiConfig::default());
        // No progress art registered: half the screen
        assert_eq!(state.bar_width(), 384);
    }
}
