//! # Composition Module
//!
//! Builds the layered composite request and drives a run from input discovery
//! to the finished render.

pub mod request;
pub mod engine;

pub use request::{
    build_background_layer, build_foreground_layer, compose, CompositeRequest, Layer, LayerRole, Resize,
};
pub use engine::{Composer, PreparedRender, RunOutcome};
