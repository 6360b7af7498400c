//! In-memory scene graph hosting LOD groups.
//!
//! [`Scene`] is a flat arena of named objects with parent/child links,
//! world-space positions, an active flag, at most one renderer each and any
//! number of cameras. It implements [`lodcull_core::SceneGraph`], so the
//! culling registry can run against it headless.

mod scene;

pub use scene::{CameraId, ObjectId, RendererId, Scene, SceneError, SceneStats};
