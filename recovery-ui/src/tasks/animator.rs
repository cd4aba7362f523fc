//! Progress animator
//!
//! Advances the indeterminate animation and time-based progress scopes
//! once per refresh period.

use embassy_time::Ticker;

use recovery_display::Renderer;
use recovery_hal::DevicePolicy;

use crate::logging::info;
use crate::RecoveryUi;

/// Tick the progress bar until shutdown
pub async fn run_animator<R: Renderer, P: DevicePolicy>(ui: &RecoveryUi<R, P>) {
    info!("Progress animator started");

    let mut ticker = Ticker::every(ui.refresh_period());
    while ui.is_running() {
        ticker.next().await;
        ui.animate().await;
    }

    info!("Progress animator stopped");
}
