//! Logging macros
//!
//! `defmt` when the `defmt` feature is on, `tracing` otherwise. Log
//! arguments stick to `{}` and `{:?}` so both backends accept them.

#[cfg(feature = "defmt")]
pub use defmt::{debug, error, info, trace, warn};

#[cfg(not(feature = "defmt"))]
pub use tracing::{debug, error, info, trace, warn};
