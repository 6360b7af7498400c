//! The scene collaborator interface.

use std::fmt::Debug;
use std::hash::Hash;

use glam::Vec3;

/// Capabilities the culling system needs from a host scene graph.
///
/// Handles are small `Copy` identifiers owned by the scene. Queries on a
/// handle that no longer exists return `None` (or zero counts); setters on
/// such handles must be silent no-ops.
pub trait SceneGraph {
    /// Handle to a scene object (a node that may own children and a renderer).
    type Object: Copy + Eq + Hash + Debug;
    /// Handle to a visual component attached to an object.
    type Renderer: Copy + Eq + Debug;
    /// Handle to a viewpoint.
    type Camera: Copy + Debug;

    /// Whether the object still exists.
    fn contains(&self, object: Self::Object) -> bool;

    /// World-space position of the object.
    fn position(&self, object: Self::Object) -> Option<Vec3>;

    /// Number of direct children.
    fn child_count(&self, object: Self::Object) -> usize;

    /// The direct child at `index`, in scene order.
    fn child(&self, object: Self::Object, index: usize) -> Option<Self::Object>;

    /// Every renderer in the object's subtree, including the object's own.
    fn renderers_in_subtree(&self, object: Self::Object) -> Vec<Self::Renderer>;

    /// The renderer attached directly to the object, if any.
    fn primary_renderer(&self, object: Self::Object) -> Option<Self::Renderer>;

    /// The object a renderer is attached to.
    fn renderer_object(&self, renderer: Self::Renderer) -> Option<Self::Object>;

    /// Whether the renderer is enabled. `None` if it no longer exists.
    fn renderer_enabled(&self, renderer: Self::Renderer) -> Option<bool>;

    fn set_renderer_enabled(&mut self, renderer: Self::Renderer, enabled: bool);

    /// The object's own active flag. `None` if it no longer exists.
    fn is_active(&self, object: Self::Object) -> Option<bool>;

    fn set_active(&mut self, object: Self::Object, active: bool);

    /// Locate the main camera. Hosts may implement this as a search; callers
    /// cache the result.
    fn find_main_camera(&self) -> Option<Self::Camera>;

    /// Current world-space position of the camera. `None` if it is gone.
    fn camera_position(&self, camera: Self::Camera) -> Option<Vec3>;
}
