//! Core systems for the gadget runtime.
//!
//! This crate provides the foundational pieces shared by the rendering and
//! element crates:
//!
//! - **Errors**: [`GadgetError`] and its component error types
//! - **Logging**: target and span name constants for `tracing` filters
//! - **Geometry values**: [`GeometryValue`], the pixel-or-relative value type
//!   used by element positions and sizes
//! - **Timers**: [`TimerTable`], the token based timeout / interval /
//!   animation scheduler owned by every view
//!
//! # Geometry Value Example
//!
//! ```
//! use gadget_core::GeometryValue;
//!
//! let pixels: GeometryValue = "40".parse().unwrap();
//! assert_eq!(pixels, GeometryValue::Pixel(40.0));
//!
//! let relative: GeometryValue = "50%".parse().unwrap();
//! assert_eq!(relative, GeometryValue::Relative(0.5));
//!
//! assert!("50x%".parse::<GeometryValue>().is_err());
//! ```
//!
//! # Timer Example
//!
//! ```
//! use std::time::{Duration, Instant};
//! use gadget_core::TimerTable;
//!
//! let start = Instant::now();
//! let mut timers: TimerTable<&'static str> = TimerTable::new();
//! let token = timers
//!     .set_timeout(Duration::from_millis(5), "hello", start)
//!     .unwrap();
//!
//! // Nothing is due yet.
//! assert!(timers.take_due(start).is_none());
//!
//! let due = timers.take_due(start + Duration::from_millis(5)).unwrap();
//! assert_eq!(due.token, token);
//! assert_eq!(due.slot, "hello");
//! ```

mod error;
pub mod logging;
mod timer;
mod value;

pub use error::{GadgetError, Result, TimerError, ValueError};
pub use timer::{
    DEFAULT_ANIMATION_INTERVAL, DueTimer, MAX_TIMER_TOKEN, TimerKind, TimerTable, TimerToken,
};
pub use value::GeometryValue;
