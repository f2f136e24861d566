//! Data structures for assemblies of parts and their visual hierarchies.
//!
//! - `instance` holds a position/rotation/scale transform and its math
//! - `scene_graph` is the named transform hierarchy every part owns
//! - `part` is the arena of parts and attach points making up an assembly
//! - `snapshot` is the persisted, read-only form of an attach point

pub mod instance;
pub mod part;
pub mod scene_graph;
pub mod snapshot;
