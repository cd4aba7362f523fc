//! Raw input source abstraction

use recovery_protocol::RawEvent;

/// Errors from input device operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InputError {
    /// No input device could be opened
    NoDevice,
    /// Read from the device failed
    Read,
    /// The event stream ended
    Closed,
}

/// Source of raw input events
///
/// Implementations merge all input nodes of the device into one stream.
pub trait InputDevice {
    /// Open and prepare the underlying devices
    fn init(&mut self) -> Result<(), InputError>;

    /// Read the next raw event
    ///
    /// May wait indefinitely; callers bound the wait with a timeout.
    fn read_event(&mut self) -> impl core::future::Future<Output = Result<RawEvent, InputError>>;
}
