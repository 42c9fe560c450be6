use anyhow::Result;
use clap::{Parser, Subcommand};
use cubeview_camera::{Camera, ViewState};
use cubeview_input::{PoseReading, apply_pose};
use cubeview_render::{DebugTextRenderer, FrameView, RenderMode, Renderer};
use cubeview_scene::{Scene, demo_scene, marker_scene};
use glam::Vec3;
use std::io::BufRead;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cubeview-cli", about = "Headless cube scene tool")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Print the scene contents and composed object placements
    Show {
        /// Use the marker scene and its camera instead of the demo scene
        #[arg(long)]
        marker: bool,
        /// Print the wireframe variant
        #[arg(long)]
        wireframe: bool,
    },
    /// Read pose lines from standard input and replay them onto the marker
    /// object, printing the scene after each applied reading
    Feed {
        /// Stop after this many applied readings
        #[arg(long)]
        max_reads: Option<usize>,
    },
}

/// The scene object the pose feed drives.
const MARKER_OBJECT: usize = 1;

fn scene_and_camera(marker: bool) -> (Scene, Camera) {
    if marker {
        (marker_scene(), Camera::at_position(Vec3::new(0.0, 0.0, 45.4)))
    } else {
        (demo_scene(), Camera::default())
    }
}

fn show(marker: bool, wireframe: bool) {
    let (scene, camera) = scene_and_camera(marker);
    let mode = if wireframe {
        RenderMode::Wireframe
    } else {
        RenderMode::Solid
    };
    let frame = FrameView::compose(&camera, &ViewState::default(), mode);
    print!("{}", DebugTextRenderer::new().render(&scene, &frame));
}

fn feed(max_reads: Option<usize>) -> Result<()> {
    let (mut scene, camera) = scene_and_camera(true);
    let frame = FrameView::compose(&camera, &ViewState::default(), RenderMode::Solid);
    let renderer = DebugTextRenderer::new();
    let limit = max_reads.unwrap_or(usize::MAX);
    let mut applied = 0usize;

    for line in std::io::stdin().lock().lines() {
        if applied >= limit {
            break;
        }
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let Some(pose) = PoseReading::parse(&line) else {
            tracing::warn!("discarding malformed pose line: {line:?}");
            continue;
        };
        let Some(object) = scene.object_mut(MARKER_OBJECT) else {
            break;
        };
        match apply_pose(object, &pose) {
            Ok(()) => {
                applied += 1;
                println!("--- reading {applied} ---");
                print!("{}", renderer.render(&scene, &frame));
            }
            Err(e) => tracing::warn!("pose reading rejected: {e}"),
        }
    }

    tracing::info!(applied, "pose feed finished");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("{}", cubeview_scene::crate_info());
            println!("{}", cubeview_camera::crate_info());
            println!("{}", cubeview_input::crate_info());
            println!("{}", cubeview_render::crate_info());
        }
        Commands::Show { marker, wireframe } => show(marker, wireframe),
        Commands::Feed { max_reads } => feed(max_reads)?,
    }

    Ok(())
}
