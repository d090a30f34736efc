#![forbid(unsafe_code)]

//! Core: geometry, pointer events, and logging for panelkit.
//!
//! # Role in panelkit
//! `panelkit-core` is the input layer. It owns the one-dimensional geometry a
//! panel group is measured in, the normalized pointer events a host forwards
//! from its own input system, and the coalescer that keeps drag recomputation
//! to one per frame.
//!
//! # How it fits in the system
//! `panelkit-layout` consumes [`geometry::Axis`] and [`event::PointerEvent`]
//! values and drives the panel-sizing engine. Hosts never need to depend on
//! `tracing` directly: the logging macros are re-exported here when the
//! `tracing` feature is enabled and compile to nothing otherwise.

pub mod event;
pub mod event_coalescer;
pub mod geometry;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
