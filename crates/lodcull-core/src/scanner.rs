//! Membership scanning: which renderers and child objects a group toggles.

use rustc_hash::FxHashSet;
use tracing::warn;

use crate::error::LodError;
use crate::group::GroupId;
use crate::scene::SceneGraph;

/// Result of scanning an owner's children.
#[derive(Clone, Debug, PartialEq)]
pub struct Membership<O, R> {
    /// Renderers anywhere in the owner's subtree, minus the owner's own.
    pub renderers: Vec<R>,
    /// Direct children of the owner.
    pub objects: Vec<O>,
    /// Live child count at scan time.
    pub child_count: usize,
}

/// Walk `owner`'s children once and collect the members of group `id`.
///
/// Objects in `excluded` are skipped, and so is every renderer attached to
/// one of them. Empty lists are reported as warnings; a group with no members
/// is valid but has no culling effect.
pub fn scan<S: SceneGraph>(
    scene: &S,
    id: GroupId,
    owner: S::Object,
    excluded: &FxHashSet<S::Object>,
) -> Membership<S::Object, S::Renderer> {
    let child_count = scene.child_count(owner);
    let own_renderer = scene.primary_renderer(owner);

    let renderers: Vec<S::Renderer> = scene
        .renderers_in_subtree(owner)
        .into_iter()
        .filter(|&r| Some(r) != own_renderer)
        .filter(|&r| {
            scene
                .renderer_object(r)
                .is_none_or(|object| !excluded.contains(&object))
        })
        .collect();

    let objects: Vec<S::Object> = (0..child_count)
        .filter_map(|index| scene.child(owner, index))
        .filter(|object| *object != owner && !excluded.contains(object))
        .collect();

    if renderers.is_empty() {
        warn!("{}", LodError::EmptyMembership { id, list: "renderers" });
    }
    if objects.is_empty() {
        warn!("{}", LodError::EmptyMembership { id, list: "objects" });
    }

    Membership {
        renderers,
        objects,
        child_count,
    }
}
