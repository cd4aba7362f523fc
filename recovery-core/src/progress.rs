//! Progress bar state
//!
//! Determinate progress is split into scopes: each scope covers a portion of
//! the bar, starts where the previous scope ended and can advance on its own
//! from a time estimate. Indeterminate progress cycles animation frames.
//!
//! Time is passed in as milliseconds since an arbitrary epoch.

/// Indeterminate animation frames
pub const INDETERMINATE_FRAMES: u8 = 6;

/// What the progress bar shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProgressMode {
    /// No bar
    #[default]
    None,
    /// Animated bar without a known end
    Indeterminate,
    /// Filled bar
    Determinate,
}

/// Progress bar state
#[derive(Debug, Clone, Default)]
pub struct Progress {
    mode: ProgressMode,
    scope_start: f32,
    scope_size: f32,
    scope_started_ms: u64,
    scope_duration_ms: u64,
    /// Progress within the current scope, 0.0..=1.0
    fraction: f32,
    frame: u8,
}

impl Progress {
    pub const fn new() -> Self {
        Self {
            mode: ProgressMode::None,
            scope_start: 0.0,
            scope_size: 0.0,
            scope_started_ms: 0,
            scope_duration_ms: 0,
            fraction: 0.0,
            frame: 0,
        }
    }

    pub fn mode(&self) -> ProgressMode {
        self.mode
    }

    /// Progress within the current scope
    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    /// Current indeterminate animation frame
    pub fn frame(&self) -> u8 {
        self.frame
    }

    /// Switch to the indeterminate animation
    ///
    /// Returns true if the mode changed.
    pub fn show_indeterminate(&mut self) -> bool {
        let changed = self.mode != ProgressMode::Indeterminate;
        self.mode = ProgressMode::Indeterminate;
        changed
    }

    /// Open a new determinate scope covering `portion` of the bar
    ///
    /// The scope starts where the previous one ended. With a non-zero
    /// `seconds` estimate the animator advances it over time.
    pub fn begin_scope(&mut self, portion: f32, seconds: u32, now_ms: u64) {
        self.mode = ProgressMode::Determinate;
        self.scope_start += self.scope_size;
        self.scope_size = clamp_unit(portion);
        self.scope_started_ms = now_ms;
        self.scope_duration_ms = seconds as u64 * 1000;
        self.fraction = 0.0;
    }

    /// Set progress within the current scope
    ///
    /// Returns true if the fill moved by at least one pixel on a bar
    /// `bar_width` pixels wide. Progress never moves backwards.
    pub fn set_fraction(&mut self, fraction: f32, bar_width: u32) -> bool {
        let fraction = clamp_unit(fraction);
        if self.mode != ProgressMode::Determinate || fraction <= self.fraction {
            return false;
        }
        if self.scope_pixels(self.fraction, bar_width) == self.scope_pixels(fraction, bar_width) {
            return false;
        }
        self.fraction = fraction;
        true
    }

    /// Back to no progress bar
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Advance one animation period
    ///
    /// Returns true if the progress region needs a repaint.
    pub fn tick(&mut self, now_ms: u64, overlay_visible: bool, bar_width: u32) -> bool {
        match self.mode {
            ProgressMode::Indeterminate if !overlay_visible => {
                self.frame = (self.frame + 1) % INDETERMINATE_FRAMES;
                true
            }
            ProgressMode::Determinate if self.scope_duration_ms > 0 => {
                let elapsed = now_ms.saturating_sub(self.scope_started_ms);
                let estimate = clamp_unit(elapsed as f32 / self.scope_duration_ms as f32);
                if estimate <= self.fraction {
                    return false;
                }
                let moved =
                    self.scope_pixels(self.fraction, bar_width) != self.scope_pixels(estimate, bar_width);
                self.fraction = estimate;
                moved
            }
            _ => false,
        }
    }

    /// Filled width in pixels of a bar `bar_width` pixels wide
    pub fn fill_width(&self, bar_width: u32) -> u32 {
        let position = clamp_unit(self.scope_start + self.fraction * self.scope_size);
        (position * bar_width as f32) as u32
    }

    fn scope_pixels(&self, fraction: f32, bar_width: u32) -> i32 {
        (fraction * bar_width as f32 * self.scope_size) as i32
    }
}

fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
