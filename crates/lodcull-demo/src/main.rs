//! Headless demo of LOD group culling over a grid of blocks.
//!
//! Spawns a grid of block groups around a prototype block, registers every
//! block as an LOD group, then moves the camera in and out along a slider
//! while sweeping the registry once per simulated frame.
//!
//! Run with `cargo run -p lodcull-demo -- --grid-size 30 --culling-distance 60`.

mod slider;
mod spawn;

use clap::Parser;
use glam::Vec3;
use lodcull_config::{CliArgs, Config, default_config_dir};
use lodcull_core::{
    GroupCandidate, GroupRegistry, LodError, RegistryBuilder, SweepReport, verify_visibility,
};
use lodcull_scene::{ObjectId, Scene, SceneError};
use tracing::{error, info, warn};

use crate::slider::{CameraRig, DistanceSlider, slider_value};
use crate::spawn::{BlockBlueprint, spawn_block, spawn_grid};

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("scene setup failed: {0}")]
    Scene(#[from] SceneError),

    #[error("culling failed: {0}")]
    Lod(#[from] LodError),
}

struct DemoScene {
    scene: Scene,
    camera: ObjectId,
    target: Vec3,
    blocks: Vec<ObjectId>,
}

fn build_scene(config: &Config) -> Result<DemoScene, DemoError> {
    let mut scene = Scene::new();
    let root = scene.spawn("Blocks", Vec3::ZERO);
    let blueprint = BlockBlueprint {
        parts: config.demo.children_per_block,
        ..Default::default()
    };

    let prototype = spawn_block(&mut scene, Some(root), Vec3::ZERO, blueprint)?;
    let mut blocks = vec![prototype];
    blocks.extend(spawn_grid(
        &mut scene,
        prototype,
        blueprint,
        config.demo.grid_size,
        config.demo.spacing,
    )?);

    let camera = scene.spawn("Main Camera", Vec3::ZERO);
    scene.attach_camera(camera, true)?;

    Ok(DemoScene {
        scene,
        camera,
        target: Vec3::ZERO,
        blocks,
    })
}

fn build_registry(
    config: &Config,
    demo: &mut DemoScene,
) -> Result<GroupRegistry<Scene>, DemoError> {
    let mut builder = RegistryBuilder::new(config.culling.clone());
    for (index, &block) in demo.blocks.iter().enumerate() {
        builder.add(GroupCandidate::new(block).with_order_key(index as u64));
    }

    let (registry, report) = builder.build(&mut demo.scene)?;
    for (owner, err) in &report.rejected {
        warn!("Block {owner} not registered: {err}");
    }
    if report.is_degraded() {
        return Err(LodError::MissingCamera.into());
    }

    info!(
        "Registered {} LOD groups (coordinator {:?}), {} initially culled",
        registry.group_count(),
        report.coordinator,
        registry.groups().filter(|g| g.is_culled()).count()
    );
    Ok(registry)
}

fn run(config: &Config) -> Result<(), DemoError> {
    let mut demo = build_scene(config)?;
    let mut registry = build_registry(config, &mut demo)?;

    let slider = DistanceSlider::new(config.demo.min_distance, config.demo.max_distance);
    let mut rig = CameraRig::new(
        demo.target,
        Vec3::new(1.0, 0.0, 1.0),
        config.demo.camera_height,
        slider.min_distance,
    );

    let frames = config.demo.frames;
    let mut totals = SweepReport::default();
    for frame in 0..frames {
        rig.on_slider_value_changed(&slider, slider_value(frame, frames));
        demo.scene.set_position(demo.camera, rig.position())?;

        let report = registry.sweep(&mut demo.scene)?;
        totals.drawn += report.drawn;
        totals.culled += report.culled;
        totals.rescanned += report.rescanned;

        if config.debug.verify_visibility
            && let Some(group) = registry
                .groups()
                .find(|g| !verify_visibility(*g, &demo.scene))
        {
            warn!("Frame {frame}: group {} has members out of state", group.id());
        }

        if frame % 30 == 0 || report.transitions() > 0 {
            info!(
                "Frame {frame}: camera distance {:.1}, +{} drawn, +{} culled, {} renderers visible",
                rig.distance,
                report.drawn,
                report.culled,
                demo.scene.visible_renderer_count()
            );
        }
    }

    info!(
        "Simulated {frames} frames: {} draws, {} culls, {} rescans, {} of {} groups culled at the end",
        totals.drawn,
        totals.culled,
        totals.rescanned,
        registry.groups().filter(|g| g.is_culled()).count(),
        registry.group_count()
    );
    Ok(())
}

fn main() {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(default_config_dir);

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(2);
    }

    let log_dir = config_dir.join("logs");
    lodcull_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    info!(
        "LOD culling demo: {0}x{0} grid, spacing {1}, culling distance {2}",
        config.demo.grid_size, config.demo.spacing, config.culling.culling_distance
    );

    if let Err(e) = run(&config) {
        error!("{e}");
        std::process::exit(1);
    }
}
