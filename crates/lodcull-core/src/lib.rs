//! Distance-based LOD group culling.
//!
//! Scene objects are partitioned into [`LodGroup`]s, each with a fixed origin.
//! Once per frame the [`GroupRegistry`] sweep compares the camera's distance to
//! every origin against the culling distance and hides or shows all members of
//! a group in bulk.
//!
//! The scene itself stays outside this crate: anything implementing
//! [`SceneGraph`] can host groups.

mod builder;
mod error;
mod group;
mod registry;
mod scanner;
mod scene;
mod sweep;
mod visibility;

#[cfg(test)]
mod test_scene;

pub use builder::{BuildReport, RegistryBuilder};
pub use error::{ErrorKind, LodError};
pub use group::{GroupCandidate, GroupId, GroupOf, LodGroup};
pub use registry::{Finalized, GroupRegistry, Slot, Ticket};
pub use scanner::{Membership, scan};
pub use scene::SceneGraph;
pub use sweep::{SweepReport, Transition, next_transition};
pub use visibility::{apply_state, cull, draw, verify_visibility};

pub use lodcull_config::CullingConfig;
