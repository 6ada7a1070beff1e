use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::{Mat4, Vec3};
use tracing_subscriber::EnvFilter;
use viewcore_camera::{Camera, CameraConfig, CameraKind};
use viewcore_common::{Transform, ViewportSize};
use viewcore_engine::Engine;

#[derive(Parser)]
#[command(name = "viewcore-cli", about = "CLI tool for viewcore camera operations")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Camera config file (.yaml/.yml or .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and active camera defaults
    Info,
    /// Compute and print the matrices of a single camera
    Project {
        /// Camera kind: perspective, orthographic or ui
        #[arg(short, long, default_value = "perspective")]
        kind: CameraKind,
        /// Viewport size as WIDTHxHEIGHT
        #[arg(short, long, default_value = "800x600", value_parser = parse_viewport)]
        viewport: ViewportSize,
        /// Field of view override in degrees (perspective only)
        #[arg(short, long)]
        fov: Option<f32>,
        /// Camera position as X,Y,Z
        #[arg(short, long, default_value = "0,0,0", value_parser = parse_vec3)]
        position: Vec3,
    },
    /// Resize the viewport under a set of cameras and show the new aspect ratios
    Resize {
        /// Initial viewport size as WIDTHxHEIGHT
        #[arg(long, default_value = "800x600", value_parser = parse_viewport)]
        from: ViewportSize,
        /// New viewport size as WIDTHxHEIGHT
        #[arg(long, value_parser = parse_viewport)]
        to: ViewportSize,
    },
}

fn parse_viewport(s: &str) -> Result<ViewportSize, String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let width = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    let height = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    Ok(ViewportSize::new(width, height))
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    let parts: Vec<f32> = s
        .split(',')
        .map(|p| p.trim().parse::<f32>().map_err(|e| format!("bad component '{p}': {e}")))
        .collect::<Result<_, _>>()?;
    match parts.as_slice() {
        [x, y, z] => Ok(Vec3::new(*x, *y, *z)),
        _ => Err(format!("expected X,Y,Z, got '{s}'")),
    }
}

fn print_matrix(label: &str, m: &Mat4) {
    println!("{label}:");
    // Row-major for reading; glam stores columns.
    let t = m.transpose();
    for row in [t.x_axis, t.y_axis, t.z_axis, t.w_axis] {
        println!(
            "  [{:>10.4} {:>10.4} {:>10.4} {:>10.4}]",
            row.x, row.y, row.z, row.w
        );
    }
}

fn print_camera(camera: &Camera) {
    println!(
        "Camera [{}] kind={} viewport={}x{} aspect={:.4} near={} far={}",
        camera.id(),
        camera.kind(),
        camera.width(),
        camera.height(),
        camera.aspect(),
        camera.near_clip(),
        camera.far_clip()
    );
    if let Some(fov) = camera.field_of_view() {
        println!("field of view: {fov} deg");
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let config = match &cli.config {
        Some(path) => CameraConfig::load(path)
            .with_context(|| format!("loading camera config {}", path.display()))?,
        None => CameraConfig::default(),
    };

    match cli.command {
        Commands::Info => {
            println!("viewcore-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("engine: {}", viewcore_engine::crate_info());
            println!(
                "defaults: near={} far={} ui_near={} ui_far={} fov={} background={:?}",
                config.near_clip,
                config.far_clip,
                config.ui_near_clip,
                config.ui_far_clip,
                config.field_of_view,
                config.background_color
            );
        }
        Commands::Project {
            kind,
            viewport,
            fov,
            position,
        } => {
            let mut engine = Engine::with_config(viewport, config);
            let node = engine.scene_mut().spawn(Transform::from_position(position));
            engine.attach_camera(node, kind)?;
            if let Some(fov) = fov {
                let camera = engine.camera_mut(node).context("camera missing after attach")?;
                camera.set_field_of_view(fov)?;
            }
            engine.update();

            let camera = engine.camera(node).context("camera missing after update")?;
            print_camera(camera);
            print_matrix("projection", camera.projection_matrix());
            print_matrix("view-projection", camera.view_projection_matrix());
            if let Some(forward) = camera.forward_vector(engine.scene()) {
                println!("forward: ({:.3}, {:.3}, {:.3})", forward.x, forward.y, forward.z);
            }
            if !camera.view_projection_matrix().is_finite() {
                tracing::warn!("matrices are degenerate; check viewport height and field of view");
            }
        }
        Commands::Resize { from, to } => {
            let mut engine = Engine::with_config(from, config);
            let mut nodes = Vec::new();
            for kind in [CameraKind::Perspective, CameraKind::Orthographic, CameraKind::Ui] {
                let node = engine.scene_mut().spawn(Transform::default());
                engine.attach_camera(node, kind)?;
                nodes.push(node);
            }
            engine.update();

            println!("Before resize ({from}):");
            for node in &nodes {
                if let Some(camera) = engine.camera(*node) {
                    print_camera(camera);
                }
            }

            engine.set_viewport_size(to);
            println!("After resize ({to}):");
            for node in &nodes {
                if let Some(camera) = engine.camera(*node) {
                    print_camera(camera);
                }
            }
            println!(
                "registered: {}, ui: {}",
                engine.active_cameras().len(),
                engine.ui_cameras().len()
            );

            engine.shutdown();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_viewport_accepts_both_separators() {
        assert_eq!(parse_viewport("1024x768").unwrap(), ViewportSize::new(1024, 768));
        assert_eq!(parse_viewport("640X480").unwrap(), ViewportSize::new(640, 480));
        assert!(parse_viewport("1024").is_err());
        assert!(parse_viewport("ax2").is_err());
    }

    #[test]
    fn parse_vec3_components() {
        assert_eq!(parse_vec3("1, 2.5,-3").unwrap(), Vec3::new(1.0, 2.5, -3.0));
        assert!(parse_vec3("1,2").is_err());
    }

    #[test]
    fn cli_parses_project() {
        let cli = Cli::try_parse_from([
            "viewcore-cli",
            "project",
            "--kind",
            "ui",
            "--viewport",
            "1024x768",
        ])
        .unwrap();
        match cli.command {
            Commands::Project { kind, viewport, .. } => {
                assert_eq!(kind, CameraKind::Ui);
                assert_eq!(viewport, ViewportSize::new(1024, 768));
            }
            _ => panic!("expected project"),
        }
    }
}
