//! LOD group records and registration candidates.

use std::fmt;
use std::hash::Hash;

use glam::Vec3;
use rustc_hash::FxHashSet;

use crate::scanner::Membership;
use crate::scene::SceneGraph;

/// Stable index of a group within one registry epoch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u32);

impl GroupId {
    /// The slot index this id addresses.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One culling unit: an owning object plus the members toggled with it.
///
/// Written by the registry at finalize time; afterwards only `culled` and the
/// member lists change.
#[derive(Clone, Debug)]
pub struct LodGroup<O, R> {
    pub(crate) id: GroupId,
    pub(crate) owner: O,
    pub(crate) origin: Vec3,
    pub(crate) culled: bool,
    pub(crate) disable_renderer_only: bool,
    pub(crate) update_by_count: bool,
    pub(crate) culling_distance: Option<f32>,
    pub(crate) child_count: usize,
    pub(crate) child_renderers: Vec<R>,
    pub(crate) child_objects: Vec<O>,
    pub(crate) excluded: FxHashSet<O>,
}

/// The [`LodGroup`] type hosted by scene `S`.
pub type GroupOf<S> = LodGroup<<S as SceneGraph>::Object, <S as SceneGraph>::Renderer>;

impl<O, R> LodGroup<O, R> {
    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn owner(&self) -> &O {
        &self.owner
    }

    /// Position captured from the owner at registration. Never updated.
    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    pub fn is_culled(&self) -> bool {
        self.culled
    }

    pub fn disable_renderer_only(&self) -> bool {
        self.disable_renderer_only
    }

    pub fn update_by_count(&self) -> bool {
        self.update_by_count
    }

    /// Child count observed by the last scan.
    pub fn child_count(&self) -> usize {
        self.child_count
    }

    pub fn child_renderers(&self) -> &[R] {
        &self.child_renderers
    }

    pub fn child_objects(&self) -> &[O] {
        &self.child_objects
    }

    pub fn excluded(&self) -> &FxHashSet<O> {
        &self.excluded
    }

    /// The per-group override, if any.
    pub fn culling_distance_override(&self) -> Option<f32> {
        self.culling_distance
    }

    /// Threshold this group is compared against, given the registry's global one.
    pub fn threshold(&self, global: f32) -> f32 {
        self.culling_distance.unwrap_or(global)
    }

    /// Replace the member lists with a fresh scan result.
    pub(crate) fn set_membership(&mut self, membership: Membership<O, R>) {
        self.child_count = membership.child_count;
        self.child_renderers = membership.renderers;
        self.child_objects = membership.objects;
    }
}

/// What scene-setup code hands the registry for each prospective group.
///
/// Policy fields left as `None` fall back to the registry's
/// [`CullingConfig`](lodcull_config::CullingConfig).
#[derive(Clone, Debug)]
pub struct GroupCandidate<O> {
    /// The object whose children form the group.
    pub owner: O,
    /// Disabled candidates are ignored at registration.
    pub enabled: bool,
    /// Sort key used by [`RegistryBuilder`](crate::RegistryBuilder) to assign ids.
    pub order_key: u64,
    pub disable_renderer_only: Option<bool>,
    pub update_by_count: Option<bool>,
    pub culling_distance: Option<f32>,
    /// Objects never treated as members, together with their renderers.
    pub excluded: FxHashSet<O>,
}

impl<O: Copy + Eq + Hash> GroupCandidate<O> {
    /// An enabled candidate with default policy and no exclusions.
    pub fn new(owner: O) -> Self {
        Self {
            owner,
            enabled: true,
            order_key: 0,
            disable_renderer_only: None,
            update_by_count: None,
            culling_distance: None,
            excluded: FxHashSet::default(),
        }
    }

    pub fn with_order_key(mut self, key: u64) -> Self {
        self.order_key = key;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_disable_renderer_only(mut self, value: bool) -> Self {
        self.disable_renderer_only = Some(value);
        self
    }

    pub fn with_update_by_count(mut self, value: bool) -> Self {
        self.update_by_count = Some(value);
        self
    }

    pub fn with_culling_distance(mut self, distance: f32) -> Self {
        self.culling_distance = Some(distance);
        self
    }

    /// Exclude an object (and any renderer attached to it) from membership.
    pub fn exclude(mut self, object: O) -> Self {
        self.excluded.insert(object);
        self
    }
}
