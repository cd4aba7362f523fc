//! Input loop
//!
//! Reads raw events with a bounded wait so shutdown is noticed at least
//! once per refresh period, normalizes them and hands the result to the
//! UI.

use embassy_time::{with_timeout, Timer};

use recovery_core::input::Normalizer;
use recovery_display::Renderer;
use recovery_hal::{DevicePolicy, InputDevice, InputError};

use crate::logging::{error, info, trace, warn};
use crate::RecoveryUi;

/// Read and dispatch input until shutdown or until the device closes
pub async fn run_input<R, P, D>(ui: &RecoveryUi<R, P>, device: &mut D)
where
    R: Renderer,
    P: DevicePolicy,
    D: InputDevice,
{
    info!("Input task started");

    if let Err(e) = device.init() {
        error!("Input device init failed: {:?}", e);
        return;
    }

    let mut normalizer = Normalizer::from_config(ui.config());
    let period = ui.refresh_period();

    while ui.is_running() {
        let raw = match with_timeout(period, device.read_event()).await {
            // Nothing within one period; check for shutdown
            Err(_) => continue,
            Ok(Ok(raw)) => raw,
            Ok(Err(InputError::Closed)) => {
                info!("Input device closed");
                break;
            }
            Ok(Err(e)) => {
                warn!("Input read error: {:?}", e);
                Timer::after(period).await;
                continue;
            }
        };

        trace!("Raw event {} {} {}", raw.kind, raw.code, raw.value);
        if let Some(normalized) = normalizer.feed(raw, ui.policy()) {
            ui.dispatch(normalized).await;
        }
    }

    info!("Input task stopped");
}
