//! Arena-backed scene storage.

use std::fmt;

use glam::Vec3;
use lodcull_core::SceneGraph;
use tracing::trace;

/// Handle to a scene object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u32);

/// Handle to a renderer component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RendererId(u32);

/// Handle to a camera component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CameraId(u32);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// Errors returned by structural scene edits.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    #[error("{0} does not exist")]
    MissingObject(ObjectId),

    #[error("parenting {child} under {parent} would create a cycle")]
    Cycle { child: ObjectId, parent: ObjectId },
}

/// Counters of the calls the culling system makes into the scene.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SceneStats {
    pub renderer_toggles: usize,
    pub activation_toggles: usize,
}

#[derive(Debug)]
struct Node {
    name: String,
    parent: Option<ObjectId>,
    children: Vec<ObjectId>,
    position: Vec3,
    active: bool,
    renderer: Option<RendererId>,
    camera: Option<CameraId>,
}

#[derive(Debug)]
struct RendererSlot {
    object: ObjectId,
    enabled: bool,
}

#[derive(Debug)]
struct CameraSlot {
    object: ObjectId,
    main: bool,
}

/// A headless scene graph.
///
/// Positions are world-space; moving an object moves its whole subtree.
/// Despawned handles are never reused.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<Option<Node>>,
    renderers: Vec<Option<RendererSlot>>,
    cameras: Vec<Option<CameraSlot>>,
    stats: SceneStats,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a root object.
    pub fn spawn(&mut self, name: impl Into<String>, position: Vec3) -> ObjectId {
        let id = ObjectId(self.nodes.len() as u32);
        self.nodes.push(Some(Node {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            position,
            active: true,
            renderer: None,
            camera: None,
        }));
        id
    }

    /// Spawn an object under `parent`, offset from the parent's position.
    pub fn spawn_child(
        &mut self,
        parent: ObjectId,
        name: impl Into<String>,
        offset: Vec3,
    ) -> Result<ObjectId, SceneError> {
        let origin = self.node(parent)?.position;
        let child = self.spawn(name, origin + offset);
        self.attach(child, parent);
        Ok(child)
    }

    /// Move `child` under `parent`, or to the root when `parent` is `None`.
    pub fn set_parent(
        &mut self,
        child: ObjectId,
        parent: Option<ObjectId>,
    ) -> Result<(), SceneError> {
        self.node(child)?;
        if let Some(parent) = parent {
            self.node(parent)?;
            if self.is_ancestor_or_self(child, parent) {
                return Err(SceneError::Cycle { child, parent });
            }
        }
        self.detach(child);
        if let Some(parent) = parent {
            self.attach(child, parent);
        }
        Ok(())
    }

    /// Attach a renderer to `object`. An existing renderer is returned as is.
    pub fn attach_renderer(&mut self, object: ObjectId) -> Result<RendererId, SceneError> {
        if let Some(existing) = self.node(object)?.renderer {
            return Ok(existing);
        }
        let id = RendererId(self.renderers.len() as u32);
        self.renderers.push(Some(RendererSlot {
            object,
            enabled: true,
        }));
        self.node_mut(object)?.renderer = Some(id);
        Ok(id)
    }

    /// Attach a camera to `object`. Marking it main clears the flag on others.
    pub fn attach_camera(&mut self, object: ObjectId, main: bool) -> Result<CameraId, SceneError> {
        self.node(object)?;
        if main {
            for camera in self.cameras.iter_mut().flatten() {
                camera.main = false;
            }
        }
        let id = CameraId(self.cameras.len() as u32);
        self.cameras.push(Some(CameraSlot { object, main }));
        self.node_mut(object)?.camera = Some(id);
        Ok(id)
    }

    /// Move an object and its subtree so the object ends up at `position`.
    pub fn set_position(&mut self, object: ObjectId, position: Vec3) -> Result<(), SceneError> {
        let delta = position - self.node(object)?.position;
        let mut stack = vec![object];
        while let Some(id) = stack.pop() {
            let node = self.node_mut(id)?;
            node.position += delta;
            stack.extend(node.children.iter().copied());
        }
        Ok(())
    }

    /// Remove an object with its subtree and every component attached to it.
    pub fn despawn(&mut self, object: ObjectId) -> Result<(), SceneError> {
        self.node(object)?;
        self.detach(object);

        let mut stack = vec![object];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id.0 as usize).and_then(Option::take) else {
                continue;
            };
            if let Some(renderer) = node.renderer {
                self.renderers[renderer.0 as usize] = None;
            }
            if let Some(camera) = node.camera {
                self.cameras[camera.0 as usize] = None;
            }
            stack.extend(node.children);
        }
        trace!("Despawned {object} and its subtree");
        Ok(())
    }

    pub fn name(&self, object: ObjectId) -> Option<&str> {
        self.node(object).ok().map(|n| n.name.as_str())
    }

    pub fn parent(&self, object: ObjectId) -> Option<ObjectId> {
        self.node(object).ok().and_then(|n| n.parent)
    }

    pub fn children(&self, object: ObjectId) -> &[ObjectId] {
        self.node(object)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Active flag of the object and all its ancestors.
    pub fn active_in_hierarchy(&self, object: ObjectId) -> bool {
        let mut current = Some(object);
        while let Some(id) = current {
            match self.node(id) {
                Ok(node) if node.active => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Renderers that are enabled and whose object is active in the hierarchy.
    pub fn visible_renderer_count(&self) -> usize {
        self.renderers
            .iter()
            .flatten()
            .filter(|r| r.enabled && self.active_in_hierarchy(r.object))
            .count()
    }

    pub fn object_count(&self) -> usize {
        self.nodes.iter().flatten().count()
    }

    pub fn renderer_count(&self) -> usize {
        self.renderers.iter().flatten().count()
    }

    pub fn stats(&self) -> SceneStats {
        self.stats
    }

    fn node(&self, object: ObjectId) -> Result<&Node, SceneError> {
        self.nodes
            .get(object.0 as usize)
            .and_then(Option::as_ref)
            .ok_or(SceneError::MissingObject(object))
    }

    fn node_mut(&mut self, object: ObjectId) -> Result<&mut Node, SceneError> {
        self.nodes
            .get_mut(object.0 as usize)
            .and_then(Option::as_mut)
            .ok_or(SceneError::MissingObject(object))
    }

    fn attach(&mut self, child: ObjectId, parent: ObjectId) {
        if let Ok(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        if let Ok(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
    }

    fn detach(&mut self, child: ObjectId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Ok(node) = self.node_mut(parent) {
            node.children.retain(|&c| c != child);
        }
        if let Ok(node) = self.node_mut(child) {
            node.parent = None;
        }
    }

    fn is_ancestor_or_self(&self, ancestor: ObjectId, object: ObjectId) -> bool {
        let mut current = Some(object);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }
}

impl SceneGraph for Scene {
    type Object = ObjectId;
    type Renderer = RendererId;
    type Camera = CameraId;

    fn contains(&self, object: ObjectId) -> bool {
        self.node(object).is_ok()
    }

    fn position(&self, object: ObjectId) -> Option<Vec3> {
        self.node(object).ok().map(|n| n.position)
    }

    fn child_count(&self, object: ObjectId) -> usize {
        self.children(object).len()
    }

    fn child(&self, object: ObjectId, index: usize) -> Option<ObjectId> {
        self.children(object).get(index).copied()
    }

    fn renderers_in_subtree(&self, object: ObjectId) -> Vec<RendererId> {
        let mut out = Vec::new();
        let mut stack = vec![object];
        while let Some(id) = stack.pop() {
            if let Ok(node) = self.node(id) {
                out.extend(node.renderer);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    fn primary_renderer(&self, object: ObjectId) -> Option<RendererId> {
        self.node(object).ok().and_then(|n| n.renderer)
    }

    fn renderer_object(&self, renderer: RendererId) -> Option<ObjectId> {
        self.renderers
            .get(renderer.0 as usize)
            .and_then(Option::as_ref)
            .map(|r| r.object)
    }

    fn renderer_enabled(&self, renderer: RendererId) -> Option<bool> {
        self.renderers
            .get(renderer.0 as usize)
            .and_then(Option::as_ref)
            .map(|r| r.enabled)
    }

    fn set_renderer_enabled(&mut self, renderer: RendererId, enabled: bool) {
        if let Some(slot) = self
            .renderers
            .get_mut(renderer.0 as usize)
            .and_then(Option::as_mut)
        {
            slot.enabled = enabled;
            self.stats.renderer_toggles += 1;
        }
    }

    fn is_active(&self, object: ObjectId) -> Option<bool> {
        self.node(object).ok().map(|n| n.active)
    }

    fn set_active(&mut self, object: ObjectId, active: bool) {
        if let Ok(node) = self.node_mut(object) {
            node.active = active;
            self.stats.activation_toggles += 1;
        }
    }

    fn find_main_camera(&self) -> Option<CameraId> {
        // Linear search; the registry caches the result per epoch.
        self.cameras
            .iter()
            .enumerate()
            .find_map(|(i, slot)| match slot {
                Some(camera) if camera.main => Some(CameraId(i as u32)),
                _ => None,
            })
    }

    fn camera_position(&self, camera: CameraId) -> Option<Vec3> {
        let slot = self.cameras.get(camera.0 as usize)?.as_ref()?;
        self.position(slot.object)
    }
}
