//! Grid spawning of block groups around a prototype.

use glam::Vec3;
use lodcull_core::SceneGraph;
use lodcull_scene::{ObjectId, Scene, SceneError};

/// Shape of one block: a rendered owner with rendered parts stacked on top.
#[derive(Clone, Copy, Debug)]
pub struct BlockBlueprint {
    pub parts: u32,
    pub part_height: f32,
}

impl Default for BlockBlueprint {
    fn default() -> Self {
        Self {
            parts: 3,
            part_height: 1.0,
        }
    }
}

/// Spawn one block at `position` under `parent`.
pub fn spawn_block(
    scene: &mut Scene,
    parent: Option<ObjectId>,
    position: Vec3,
    blueprint: BlockBlueprint,
) -> Result<ObjectId, SceneError> {
    let block = scene.spawn("Block", position);
    scene.attach_renderer(block)?;
    for i in 0..blueprint.parts {
        let part = scene.spawn_child(
            block,
            format!("Part {i}"),
            Vec3::Y * blueprint.part_height * (i + 1) as f32,
        )?;
        scene.attach_renderer(part)?;
    }
    scene.set_parent(block, parent)?;
    Ok(block)
}

/// Fill a `size` x `size` grid centered on `prototype` with copies of the
/// blueprint, `spacing` apart on the XZ plane.
///
/// The prototype's own cell is skipped and copies share the prototype's
/// parent. Returns the spawned copies in row-major order.
pub fn spawn_grid(
    scene: &mut Scene,
    prototype: ObjectId,
    blueprint: BlockBlueprint,
    size: u32,
    spacing: f32,
) -> Result<Vec<ObjectId>, SceneError> {
    let center = scene
        .position(prototype)
        .ok_or(SceneError::MissingObject(prototype))?;
    let parent = scene.parent(prototype);
    let half = size / 2;

    let side = size as usize;
    let mut spawned = Vec::with_capacity(side * side);
    for row in 0..size {
        for column in 0..size {
            if row == half && column == half {
                continue;
            }
            let offset = Vec3::new(
                (column as f32 - half as f32) * spacing,
                0.0,
                (row as f32 - half as f32) * spacing,
            );
            spawned.push(spawn_block(scene, parent, center + offset, blueprint)?);
        }
    }
    Ok(spawned)
}
