//! part-ngin
//!
//! Utilities for modular part assemblies: repositioning attach points and the
//! parts hanging off them, parsing config-node text into typed values, walking
//! named transform hierarchies and pushing display hints into property-editor
//! widgets. Everything operates in place on state owned by the caller; nothing
//! here runs its own loop or spawns work.
//!
//! High-level modules
//! - `attach`: attach point repositioning, lifecycle and radial offsetting
//! - `data_structures`: transforms, transform hierarchies, the part arena
//! - `error`: typed errors for config parsing and assembly construction
//! - `gui`: display hints for property-editor widgets
//! - `resources`: config-node store, float curves and file loading
//! - `symmetry`: apply an action to an instance and its linked counterparts
//!

pub mod attach;
pub mod data_structures;
pub mod error;
pub mod gui;
pub mod resources;
pub mod symmetry;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use data_structures::{
    instance::Instance,
    part::{Assembly, AttachPoint, AttachPointId, Part, PartId},
    scene_graph::TransformNode,
};
pub use resources::{
    animation::{FloatCurve, Keyframe},
    config::{Axis, Color, ConfigNode},
};

/// Installs `env_logger` as the `log` backend.
///
/// Safe to call more than once; later calls only print a warning.
pub fn init_logger() {
    if let Err(e) = env_logger::try_init() {
        println!("Warning: Could not initialize logger: {}", e);
    }
}
