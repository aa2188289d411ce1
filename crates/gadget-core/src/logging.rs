//! Logging facilities for the gadget runtime.
//!
//! The runtime uses the `tracing` crate for instrumentation. Nothing is
//! printed unless the host installs a subscriber:
//!
//! ```ignore
//! use tracing_subscriber::EnvFilter;
//!
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter(EnvFilter::new("gadget::draw=trace,gadget_core::timer=trace"))
//!         .init();
//!
//!     // Host code...
//! }
//! ```
//!
//! Every event is emitted with an explicit target from [`targets`], so a
//! single subsystem can be enabled without the others.

/// Span names used throughout the runtime for tracing.
///
/// These constants can be used to filter traces for specific subsystems.
pub mod span_names {
    /// A full view paint pass.
    pub const DRAW: &str = "gadget::draw";
    /// A full view layout pass.
    pub const LAYOUT: &str = "gadget::layout";
    /// Timer processing.
    pub const TIMER: &str = "gadget::timer";
    /// Mouse event routing.
    pub const DISPATCH: &str = "gadget::dispatch";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core crate target.
    pub const CORE: &str = "gadget_core";
    /// Timer table target.
    pub const TIMER: &str = "gadget_core::timer";
    /// Element node target (geometry setters, behavior hooks).
    pub const ELEMENT: &str = "gadget::element";
    /// Element container target (structural edits, extents).
    pub const CONTAINER: &str = "gadget::container";
    /// View target (size, name table, focus, timers).
    pub const VIEW: &str = "gadget::view";
    /// Paint pass target.
    pub const DRAW: &str = "gadget::draw";
    /// Event routing target.
    pub const EVENT: &str = "gadget::event";
    /// Surface allocation and rasterization target.
    pub const SURFACE: &str = "gadget_render::surface";
    /// Area and stretch-middle blit target.
    pub const BLIT: &str = "gadget_render::blit";
    /// Image loading target.
    pub const IMAGE: &str = "gadget_render::image";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets_are_namespaced() {
        for target in [
            targets::TIMER,
            targets::ELEMENT,
            targets::CONTAINER,
            targets::VIEW,
            targets::DRAW,
            targets::EVENT,
        ] {
            assert!(target.starts_with("gadget"));
            assert!(target.contains("::"));
        }
        assert!(targets::SURFACE.starts_with("gadget_render::"));
    }

    #[test]
    fn test_span_names_distinct() {
        let names = [
            span_names::DRAW,
            span_names::LAYOUT,
            span_names::TIMER,
            span_names::DISPATCH,
        ];
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
