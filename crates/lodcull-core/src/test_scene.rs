//! Minimal scene used by unit tests.

use glam::Vec3;

use crate::scene::SceneGraph;

#[derive(Debug)]
struct Node {
    position: Vec3,
    children: Vec<u32>,
    renderer: Option<u32>,
    active: bool,
    alive: bool,
}

#[derive(Debug)]
struct Renderer {
    owner: u32,
    enabled: bool,
}

/// Flat arena with one optional camera.
#[derive(Debug, Default)]
pub struct TestScene {
    nodes: Vec<Node>,
    renderers: Vec<Renderer>,
    camera: Option<Vec3>,
    /// Number of state changes made through the `SceneGraph` setters.
    pub writes: usize,
}

impl TestScene {
    pub fn new() -> Self {
        Self {
            camera: Some(Vec3::ZERO),
            ..Default::default()
        }
    }

    pub fn set_camera(&mut self, position: Option<Vec3>) {
        self.camera = position;
    }

    pub fn object(&mut self, position: Vec3) -> u32 {
        self.nodes.push(Node {
            position,
            children: Vec::new(),
            renderer: None,
            active: true,
            alive: true,
        });
        (self.nodes.len() - 1) as u32
    }

    pub fn object_with_renderer(&mut self, position: Vec3) -> u32 {
        let id = self.object(position);
        self.attach_renderer(id);
        id
    }

    pub fn add_child(&mut self, parent: u32) -> u32 {
        let position = self.nodes[parent as usize].position;
        let id = self.object(position);
        self.nodes[parent as usize].children.push(id);
        id
    }

    pub fn add_child_with_renderer(&mut self, parent: u32) -> u32 {
        let id = self.add_child(parent);
        self.attach_renderer(id);
        id
    }

    /// A group owner at `position` with `children` rendered children.
    pub fn block(&mut self, position: Vec3, children: usize) -> u32 {
        let owner = self.object_with_renderer(position);
        for _ in 0..children {
            self.add_child_with_renderer(owner);
        }
        owner
    }

    pub fn renderer_of(&self, object: u32) -> u32 {
        self.nodes[object as usize].renderer.unwrap()
    }

    pub fn despawn(&mut self, object: u32) {
        self.nodes[object as usize].alive = false;
        for node in &mut self.nodes {
            node.children.retain(|&c| c != object);
        }
    }

    fn attach_renderer(&mut self, object: u32) {
        self.renderers.push(Renderer {
            owner: object,
            enabled: true,
        });
        self.nodes[object as usize].renderer = Some((self.renderers.len() - 1) as u32);
    }

    fn node(&self, object: u32) -> Option<&Node> {
        self.nodes.get(object as usize).filter(|n| n.alive)
    }

    fn collect_renderers(&self, object: u32, out: &mut Vec<u32>) {
        if let Some(node) = self.node(object) {
            out.extend(node.renderer);
            for &child in &node.children {
                self.collect_renderers(child, out);
            }
        }
    }
}

impl SceneGraph for TestScene {
    type Object = u32;
    type Renderer = u32;
    type Camera = ();

    fn contains(&self, object: u32) -> bool {
        self.node(object).is_some()
    }

    fn position(&self, object: u32) -> Option<Vec3> {
        self.node(object).map(|n| n.position)
    }

    fn child_count(&self, object: u32) -> usize {
        self.node(object).map_or(0, |n| n.children.len())
    }

    fn child(&self, object: u32, index: usize) -> Option<u32> {
        self.node(object).and_then(|n| n.children.get(index).copied())
    }

    fn renderers_in_subtree(&self, object: u32) -> Vec<u32> {
        let mut out = Vec::new();
        self.collect_renderers(object, &mut out);
        out
    }

    fn primary_renderer(&self, object: u32) -> Option<u32> {
        self.node(object).and_then(|n| n.renderer)
    }

    fn renderer_object(&self, renderer: u32) -> Option<u32> {
        self.renderers.get(renderer as usize).map(|r| r.owner)
    }

    fn renderer_enabled(&self, renderer: u32) -> Option<bool> {
        let r = self.renderers.get(renderer as usize)?;
        self.node(r.owner).map(|_| r.enabled)
    }

    fn set_renderer_enabled(&mut self, renderer: u32, enabled: bool) {
        if let Some(r) = self.renderers.get_mut(renderer as usize) {
            r.enabled = enabled;
            self.writes += 1;
        }
    }

    fn is_active(&self, object: u32) -> Option<bool> {
        self.node(object).map(|n| n.active)
    }

    fn set_active(&mut self, object: u32, active: bool) {
        if let Some(node) = self.nodes.get_mut(object as usize) {
            node.active = active;
            self.writes += 1;
        }
    }

    fn find_main_camera(&self) -> Option<()> {
        self.camera.map(|_| ())
    }

    fn camera_position(&self, _camera: ()) -> Option<Vec3> {
        self.camera
    }
}
