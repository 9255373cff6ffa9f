//! # Waymark Telemetry
//!
//! Logging setup for services built on waymark.
//!
//! The library crates only emit `tracing` events; this crate installs the
//! subscriber that writes them out. Call [`init_logging`] once at startup:
//!
//! ```rust,no_run
//! use waymark_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::production().with_service_name("users")).unwrap();
//! ```

#![doc(html_root_url = "https://docs.rs/waymark-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::{build_filter, init_logging, LogConfig};
