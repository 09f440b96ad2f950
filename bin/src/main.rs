#[macro_use]
extern crate log;

mod options;
mod scene;

use anyhow::{Context, Result};
use api::*;
use clap::Parser;
use engine::renderer::*;
use image::RgbImage;
use indicatif::{ProgressBar, ProgressStyle};
use options::*;
use scene::*;
use std::thread;
use std::time::Duration;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(feature = "jemalloc")]
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static ALLOCATOR: Jemalloc = Jemalloc;

/// How often the progress bar polls the renderer.
const PROGRESS_POLL_INTERVAL: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    // Initialize `env_logger`.
    env_logger::init();

    let options = Options::parse();
    let job = options.job();

    let mut renderer = create_renderer(job, Box::new(demo_scene())).context("Failed to set up render")?;
    renderer.queue_render_tasks()?;

    let progress = create_progress_reporter(&options, job.samples_per_pixel as u64);
    while renderer.is_running() {
        progress.set_position(renderer.completed_passes() as u64);
        thread::sleep(PROGRESS_POLL_INTERVAL);
    }
    renderer.wait()?;
    progress.set_position(renderer.completed_passes() as u64);
    progress.finish_with_message("Render complete");

    write_image(&options.image_file, &renderer)
}

/// Returns a progress bar over render passes, hidden when `--quiet` is given.
///
/// * `options` - The options.
/// * `passes`  - Total number of passes.
fn create_progress_reporter(options: &Options, passes: u64) -> ProgressBar {
    if options.quiet {
        return ProgressBar::hidden();
    }
    let progress = ProgressBar::new(passes);
    match ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} passes {eta}") {
        Ok(style) => progress.set_style(style.progress_chars("#>-")),
        Err(err) => warn!("Invalid progress template: {err}"),
    }
    progress
}

/// Write the gamma corrected frame buffer.
///
/// * `path`     - Output file path.
/// * `renderer` - The renderer.
fn write_image(path: &str, renderer: &Renderer) -> Result<()> {
    let film = renderer.film();
    let (width, height) = (film.width() as u32, film.height() as u32);
    info!("Writing image {path} with resolution {width}x{height}");

    let img = RgbImage::from_raw(width, height, film.to_rgb8()).context("Frame buffer does not match resolution")?;
    img.save(path).with_context(|| format!("Error saving output image {path}"))
}
