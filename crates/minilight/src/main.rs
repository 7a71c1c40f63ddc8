//! MiniLight command-line renderer.
//!
//! Loads a model file, renders it by progressive path tracing, and writes
//! `<model>.ppm` snapshots at every power-of-two iteration (and at the
//! end). Ctrl-C saves the accumulation so far and exits cleanly.

use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use minilight_core::Model;
use minilight_render::{Camera, Image, Lfsr113, Scene, Triangle};
use tracing::info;

/// Minimal unbiased global-illumination renderer.
///
/// Renders a MiniLight model file to `<FILE>.ppm` by progressive Monte
/// Carlo path tracing. A snapshot is saved at every power-of-two
/// iteration, so the output stays usable while the render runs.
#[derive(Parser)]
#[command(name = "minilight", version)]
struct Args {
    /// Model file to render
    model_file_path: Option<PathBuf>,
}

enum Outcome {
    Finished,
    Interrupted,
}

fn main() -> ExitCode {
    // accept "-?" as a help alias
    let argv = std::env::args_os().map(|arg| {
        if arg == "-?" {
            OsString::from("--help")
        } else {
            arg
        }
    });
    let args = Args::parse_from(argv);

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let Some(model_path) = args.model_file_path else {
        let _ = Args::command().print_help();
        return ExitCode::SUCCESS;
    };

    match run(&model_path) {
        Ok(Outcome::Finished) => {
            println!("\nfinished");
            ExitCode::SUCCESS
        }
        Ok(Outcome::Interrupted) => {
            println!("\ninterrupted");
            ExitCode::SUCCESS
        }
        Err(error) => {
            eprintln!("*** execution failed: {error:#}");
            ExitCode::from(1)
        }
    }
}

fn run(model_path: &Path) -> Result<Outcome> {
    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let flag = Arc::clone(&interrupted);
        ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst))
            .context("installing interrupt handler")?;
    }

    let model = Model::load(model_path)
        .with_context(|| format!("loading model {}", model_path.display()))?;

    let output_path = {
        let mut name = model_path.as_os_str().to_os_string();
        name.push(".ppm");
        PathBuf::from(name)
    };

    let camera = Camera::new(
        model.camera.position,
        model.camera.direction,
        model.camera.view_angle_degrees,
    );
    let triangles: Vec<Triangle> = model
        .triangles
        .iter()
        .map(|t| {
            Triangle::new(
                t.vertices[0],
                t.vertices[1],
                t.vertices[2],
                t.reflectivity,
                t.emissivity,
            )
        })
        .collect();

    let build_start = Instant::now();
    let scene = Scene::new(
        camera.view_position(),
        model.sky_emission,
        model.ground_reflectance,
        triangles,
    );
    info!(
        triangles = scene.triangles_count(),
        emitters = scene.emitters_count(),
        elapsed = ?build_start.elapsed(),
        "scene built"
    );

    let mut image = Image::new(model.width, model.height);
    let mut rng = Lfsr113::new();

    let render_start = Instant::now();
    for iteration in 1..=model.iterations {
        if interrupted.load(Ordering::SeqCst) {
            save_image(&output_path, &image, iteration - 1)?;
            return Ok(Outcome::Interrupted);
        }

        camera.frame(&scene, &mut rng, &mut image);

        if iteration.is_power_of_two() || iteration == model.iterations {
            save_image(&output_path, &image, iteration)?;
        }

        print!("\riteration: {iteration}");
        let _ = io::stdout().flush();
    }

    info!(
        iterations = model.iterations,
        elapsed = ?render_start.elapsed(),
        output = %output_path.display(),
        "render complete"
    );
    Ok(Outcome::Finished)
}

fn save_image(path: &Path, image: &Image, iteration: u32) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    image
        .write_ppm(&mut writer, iteration)
        .with_context(|| format!("writing {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}
