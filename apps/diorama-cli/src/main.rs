mod config;
mod script;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use diorama_bend::BendingManager;
use diorama_camera::CameraRig;
use diorama_common::{MaterialId, MeshHandle};
use diorama_grass::{GrassField, SurfaceMesh};
use diorama_input::{Key, KeyState};
use diorama_render::{PassScope, RecordingBackend};
use diorama_render_wgpu::{GpuBackend, covered_pixels};
use glam::{Mat4, Vec3};
use tracing_subscriber::EnvFilter;

use crate::config::{GRASS_MATERIAL, SceneConfig};
use crate::script::{KeyScript, ScriptedPress};

const BLADE_MESH: MeshHandle = MeshHandle(1);

#[derive(Parser)]
#[command(name = "diorama-cli", about = "Drive the diorama camera, grass and bend components")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML scene config; defaults are used for anything it leaves out
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Simulate the camera rig under scripted key input
    Rig {
        /// Number of ticks to simulate
        #[arg(short, long, default_value = "10")]
        ticks: u64,
        /// Seconds per tick
        #[arg(long, default_value = "0.1")]
        dt: f32,
        /// Key held for the whole run (repeatable), e.g. `up`, `arrow_left`
        #[arg(long)]
        hold: Vec<Key>,
        /// Key tapped on one tick, as `TICK:KEY` (repeatable), e.g. `0:a`
        #[arg(long)]
        press: Vec<ScriptedPress>,
    },
    /// Scatter grass over a flat plane and report the draw batches
    Grass {
        /// Blade count (overrides the config)
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// RNG seed (overrides the config)
        #[arg(short, long)]
        seed: Option<u64>,
        /// Plane size in world units
        #[arg(long, default_value = "20.0")]
        size: f32,
        /// Plane subdivisions per side
        #[arg(long, default_value = "4")]
        subdivisions: u32,
        /// Print every placement as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run one bent camera pass over the grass and print the render state
    Bend {
        /// Blade count (overrides the config)
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// Render with bending switched off
        #[arg(long)]
        disabled: bool,
    },
    /// Render the bent grass field offscreen on the GPU
    Render {
        #[arg(long, default_value = "640")]
        width: u32,
        #[arg(long, default_value = "360")]
        height: u32,
        /// Blade count (overrides the config)
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let mut scene = SceneConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("diorama-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("render: {}", diorama_render::crate_info());
            println!("bend: {}", diorama_bend::crate_info());
            println!(
                "camera: upp={:.4} ortho={} screen={}px",
                scene.camera.units_per_pixel(),
                scene.camera.ortho_half_height,
                scene.camera.screen_height_px
            );
            println!(
                "rig: speed={}/{} rotation={}deg over {}s",
                scene.rig.forward_speed,
                scene.rig.strafe_speed,
                scene.rig.rotation_step_degrees,
                scene.rig.rotation_duration()
            );
        }
        Commands::Rig {
            ticks,
            dt,
            hold,
            press,
        } => {
            let mut rig = CameraRig::new(scene.rig, scene.camera)?;
            let mut keys = KeyState::new(scene.keymap.clone());
            let script = KeyScript::new(hold, press);
            script.start(&mut keys);

            println!(
                "tick  {:<28}{:<28}{:<9}rotating",
                "intended", "snapped", "yaw"
            );
            for tick in 0..ticks {
                script.begin_tick(&mut keys, tick);
                rig.tick_with(&keys, dt);
                script.end_tick(&mut keys, tick);

                let pose = rig.pose();
                println!(
                    "{tick:>4}  {}  {}  {:>7.2}  {}",
                    format_position(rig.intended_position()),
                    format_position(pose.position),
                    pose.yaw_degrees,
                    rig.is_rotating()
                );
            }
        }
        Commands::Grass {
            count,
            seed,
            size,
            subdivisions,
            json,
        } => {
            if let Some(count) = count {
                scene.grass.count = count;
            }
            if seed.is_some() {
                scene.grass.seed = seed;
            }
            let field = build_field(&scene, size, subdivisions);

            if json {
                println!("{}", serde_json::to_string_pretty(field.placements())?);
                return Ok(());
            }

            let mut backend = RecordingBackend::new();
            field.draw(&mut backend);
            println!(
                "Grass: {} blades over {size}x{size} plane ({} triangles)",
                field.len(),
                SurfaceMesh::plane(size, size, subdivisions).triangle_count()
            );
            print!("{}", backend.describe());
        }
        Commands::Bend { count, disabled } => {
            if let Some(count) = count {
                scene.grass.count = count;
            }
            scene.bend.enabled = !disabled;
            let field = build_field(&scene, 20.0, 4);

            let mut backend = RecordingBackend::new();
            let mut bending = BendingManager::new(scene.bend, scene.material_source());
            bending.set_camera(Some(scene.camera));
            bending.enable(&mut backend);
            {
                let mut pass = PassScope::begin(&mut bending, &mut backend);
                field.draw(pass.backend());
            }
            print!("{}", backend.describe());
            println!("Culling restored: {}", backend.culling_override().is_none());
        }
        Commands::Render {
            width,
            height,
            count,
        } => {
            if let Some(count) = count {
                scene.grass.count = count;
            }
            scene.camera.aspect = width as f32 / height as f32;
            scene.camera.screen_height_px = height as f32;
            scene.validate()?;
            let field = build_field(&scene, 20.0, 4);

            let mut gpu = GpuBackend::headless(width, height).context("GPU setup failed")?;
            gpu.upload_blade(BLADE_MESH, field.blade());
            gpu.set_view_projection(scene.camera.view_projection());

            let mut bending = BendingManager::new(scene.bend, scene.material_source());
            bending.set_camera(Some(scene.camera));
            bending.enable(&mut gpu);
            {
                let mut pass = PassScope::begin(&mut bending, &mut gpu);
                field.draw(pass.backend());
            }
            let stats = gpu.render();
            let pixels = gpu.read_pixels()?;
            println!(
                "Rendered {width}x{height}: draws={} instances={} culled={} skipped={}",
                stats.draws, stats.instances, stats.culled, stats.skipped_draws
            );
            println!(
                "Coverage: {} of {} pixels",
                covered_pixels(&pixels),
                width as usize * height as usize
            );
        }
    }

    Ok(())
}

/// Scatter the configured grass over a flat plane centred on the origin.
fn build_field(scene: &SceneConfig, size: f32, subdivisions: u32) -> GrassField {
    let surface = SurfaceMesh::plane(size, size, subdivisions);
    GrassField::initialize(
        &surface,
        Mat4::IDENTITY,
        &scene.grass,
        BLADE_MESH,
        MaterialId(GRASS_MATERIAL),
    )
}

fn format_position(p: Vec3) -> String {
    format!("({:>7.3}, {:>6.3}, {:>7.3})", p.x, p.y, p.z)
}
