//! Renderer

mod job;

use crate::camera::*;
use crate::error::*;
use crate::estimator::*;
use crate::film::*;
use crate::filter::*;
use crate::memory::*;
use crate::parallel::*;
use crate::rng::*;
use crate::sampler::*;
use crate::scene::*;
use crate::spectrum::*;
use arc_swap::ArcSwap;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;

// Re-export.
pub use job::*;

/// The pluggable collaborators of a render.
pub struct RenderComponents {
    /// Reconstruction filter used by the film.
    pub filter: ArcFilter,

    /// Sample generator shared by every worker.
    pub sampler: ArcSampler,

    /// Light transport estimator. Mutable until `request_samples()` ran.
    pub estimator: Box<dyn Estimator + Send + Sync>,

    /// Film post-process applied when the job asks for denoising.
    pub post_process: Option<ArcFilmPostProcess>,
}

/// Scratch state owned by one worker.
struct WorkerScratch {
    /// Random number generator.
    rng: RNG,

    /// Transient memory reset after every pixel sample.
    arena: MemoryArena,
}

impl WorkerScratch {
    fn new(seed: u64) -> Self {
        Self {
            rng: RNG::new(seed),
            arena: MemoryArena::default(),
        }
    }
}

/// State shared between the renderer and its workers.
struct RenderContext {
    /// The current camera. Replaced only while workers are stopped.
    camera: ArcSwap<Camera>,

    /// The current film. Replaced only while workers are stopped.
    film: ArcSwap<Film>,

    /// The scene.
    scene: ArcScene,

    /// The sample generator.
    sampler: ArcSampler,

    /// The light transport estimator.
    estimator: ArcEstimator,

    /// Sample buffer laid out as the estimator requested; cloned per worker.
    sample_template: SampleBuffer,

    /// Tile queue, barriers and abort flag.
    task_sync: TaskSynchronizer,

    /// Per-worker scratch indexed by worker id.
    scratch: Vec<Mutex<WorkerScratch>>,

    /// Number of sampling passes.
    samples_per_pixel: usize,
}

/// Sets the abort flag if a worker unwinds so the other workers leave their
/// barrier waits.
struct AbortOnPanic<'a> {
    task_sync: &'a TaskSynchronizer,
    thread_id: usize,
}

impl Drop for AbortOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            error!("Worker {} panicked; aborting render", self.thread_id);
            self.task_sync.set_abort(true);
        }
    }
}

/// Drives a fixed pool of workers through the sampling passes of a job.
pub struct Renderer {
    /// The job being rendered.
    job: RenderJobDesc,

    /// State shared with the workers.
    context: Arc<RenderContext>,

    /// The worker pool.
    scheduler: ThreadScheduler,

    /// Number of render workers.
    thread_count: usize,

    /// True between queueing render tasks and joining them.
    running: bool,
}

impl Renderer {
    /// Set up a render. The configuration is validated before any thread is
    /// started; the workers stay idle until `queue_render_tasks()`.
    ///
    /// * `job`        - The job description.
    /// * `scene`      - The scene; its accelerator is built here.
    /// * `components` - Filter, sampler, estimator and post-process.
    /// * `scheduler`  - The worker pool.
    pub fn new(
        job: RenderJobDesc,
        mut scene: Box<dyn Scene + Send + Sync>,
        components: RenderComponents,
        mut scheduler: ThreadScheduler,
    ) -> Result<Self, RenderError> {
        job.validate()?;

        let thread_count = match job.thread_count {
            Some(n) if n > scheduler.thread_count() => {
                warn!(
                    "Requested {} render threads but scheduler has {}; using {}",
                    n,
                    scheduler.thread_count(),
                    scheduler.thread_count()
                );
                scheduler.thread_count()
            }
            Some(n) => n,
            None => scheduler.thread_count(),
        };

        let camera = Camera::new(job.camera, job.width, job.height)?;

        info!("Building scene accelerator");
        scene.build_accelerator();

        let post_process = match (job.denoise, components.post_process) {
            (true, None) => {
                warn!("Denoising requested but no film post-process was supplied");
                None
            }
            (true, post_process) => post_process,
            (false, _) => None,
        };
        let film = Film::new(job.width, job.height, components.filter).with_post_process(post_process);

        let mut estimator = components.estimator;
        let mut sample_template = SampleBuffer::new();
        estimator.request_samples(scene.as_ref(), &mut sample_template);

        let task_sync = TaskSynchronizer::new(job.tile_size);
        task_sync.init(job.width, job.height, thread_count);

        let scratch = (0..thread_count)
            .map(|i| Mutex::new(WorkerScratch::new(job.seed.wrapping_add(i as u64))))
            .collect();

        scheduler.init_and_launch_threads()?;

        info!(
            "Rendering {}x{} at {} spp with {} threads ({:?} estimator, {:?} sampler, {:?} filter)",
            job.width, job.height, job.samples_per_pixel, thread_count, job.estimator, job.sampler, job.filter
        );

        let context = RenderContext {
            camera: ArcSwap::from_pointee(camera),
            film: ArcSwap::from_pointee(film),
            scene: Arc::from(scene),
            sampler: components.sampler,
            estimator: Arc::from(estimator),
            sample_template,
            task_sync,
            scratch,
            samples_per_pixel: job.samples_per_pixel,
        };

        Ok(Self {
            job,
            context: Arc::new(context),
            scheduler,
            thread_count,
            running: false,
        })
    }

    /// Start rendering from pass zero. A running render is stopped first.
    pub fn queue_render_tasks(&mut self) -> Result<(), RenderError> {
        self.stop_render_tasks()?;

        let ctx = &self.context;
        ctx.film.load().clear();
        ctx.task_sync.init(self.job.width, self.job.height, self.thread_count);
        ctx.task_sync.set_abort(false);

        for thread_id in 0..self.thread_count {
            let ctx = Arc::clone(&self.context);
            self.scheduler.add_task(move || render_image(&ctx, thread_id));
        }
        self.running = true;
        Ok(())
    }

    /// Abort a running render and wait for every worker to leave. The film
    /// keeps the image of the last completed pass.
    pub fn stop_render_tasks(&mut self) -> Result<(), RenderError> {
        if !self.running {
            return Ok(());
        }
        self.context.task_sync.set_abort(true);
        self.join()
    }

    /// Wait for the render to finish every pass.
    pub fn wait(&mut self) -> Result<(), RenderError> {
        if !self.running {
            return Ok(());
        }
        self.join()
    }

    fn join(&mut self) -> Result<(), RenderError> {
        let result = self.scheduler.join_all_tasks();
        self.running = false;
        info!("Render stopped after {} passes", self.completed_passes());
        result
    }

    /// Change the image resolution. A running render restarts from pass zero.
    ///
    /// * `width`  - Image width in pixels.
    /// * `height` - Image height in pixels.
    pub fn resize(&mut self, width: usize, height: usize) -> Result<(), RenderError> {
        let job = RenderJobDesc { width, height, ..self.job };
        job.validate()?;

        let was_running = self.running;
        self.stop_render_tasks()?;

        let ctx = &self.context;
        ctx.camera.store(Arc::new(ctx.camera.load().resize(width, height)));
        ctx.film.store(Arc::new(ctx.film.load().resized(width, height)));
        ctx.task_sync.init(width, height, self.thread_count);
        self.job = job;
        info!("Resized to {}x{}", width, height);

        if was_running {
            self.queue_render_tasks()?;
        }
        Ok(())
    }

    /// Replace the camera. A running render restarts from pass zero.
    ///
    /// * `params` - The new camera parameters.
    pub fn set_camera_params(&mut self, params: CameraParams) -> Result<(), RenderError> {
        let camera = Camera::new(params, self.job.width, self.job.height)?;

        let was_running = self.running;
        self.stop_render_tasks()?;

        self.context.camera.store(Arc::new(camera));
        self.job.camera = params;

        if was_running {
            self.queue_render_tasks()?;
        }
        Ok(())
    }

    /// Returns a snapshot of the display buffer.
    pub fn frame_buffer(&self) -> Arc<Vec<Spectrum>> {
        self.context.film.load().frame_buffer()
    }

    /// Returns the number of passes completed since the render started.
    pub fn completed_passes(&self) -> usize {
        self.context.film.load().sample_count()
    }

    /// Returns true while workers are rendering.
    pub fn is_running(&self) -> bool {
        self.running && !self.context.task_sync.aborted() && self.completed_passes() < self.job.samples_per_pixel
    }

    /// Returns the job description.
    pub fn job(&self) -> &RenderJobDesc {
        &self.job
    }

    /// Returns the current film.
    pub fn film(&self) -> Arc<Film> {
        self.context.film.load_full()
    }

    /// Returns the current camera.
    pub fn camera(&self) -> Arc<Camera> {
        self.context.camera.load_full()
    }

    /// Returns the number of render workers.
    pub fn thread_count(&self) -> usize {
        self.thread_count
    }
}

impl Drop for Renderer {
    fn drop(&mut self) {
        if let Err(err) = self.stop_render_tasks() {
            error!("Failed to stop render: {}", err);
        }
    }
}

/// The per-worker render loop. Renders every pass of the job unless abort
/// is raised; worker 0 finalizes each pass.
///
/// * `ctx`       - The shared render state.
/// * `thread_id` - The worker id in `0..thread_count`.
fn render_image(ctx: &RenderContext, thread_id: usize) {
    let task_sync = &ctx.task_sync;
    let _guard = AbortOnPanic { task_sync, thread_id };

    let mut scratch = ctx.scratch[thread_id].lock().unwrap_or_else(PoisonError::into_inner);
    let WorkerScratch { rng, arena } = &mut *scratch;
    let mut sample = ctx.sample_template.clone();

    for pass in 0..ctx.samples_per_pixel {
        if !task_sync.sync_threads_pre_render(thread_id) {
            break;
        }

        let camera = ctx.camera.load_full();
        let film = ctx.film.load_full();

        while let Some(tile) = task_sync.get_next_task() {
            debug!("Worker {} rendering tile {} of pass {}", thread_id, tile.bounds(), pass);
            let mut film_tile = film.get_film_tile(&tile.bounds());

            for pixel in tile.pixels() {
                if task_sync.aborted() {
                    break;
                }

                ctx.sampler.generate_samples(pass, &pixel, &mut sample, rng);
                sample.offset_to_pixel(&pixel);

                let ray = camera.generate_ray_differential(&sample.camera);
                let mut l = ctx.estimator.li(&ray, ctx.scene.as_ref(), &sample, rng, arena);

                // Replace unexpected radiance values with black.
                if l.has_nans() {
                    error!(
                        "Not-a-number radiance value returned for pixel ({}, {}), pass {}. Setting to black.",
                        pixel.x, pixel.y, pass
                    );
                    l = Spectrum::ZERO;
                } else if l.y() < 0.0 {
                    error!(
                        "Negative luminance value, {}, returned for pixel ({}, {}), pass {}. Setting to black.",
                        l.y(),
                        pixel.x,
                        pixel.y,
                        pass
                    );
                    l = Spectrum::ZERO;
                } else if l.c.iter().any(|v| v.is_infinite()) {
                    error!(
                        "Infinite radiance value returned for pixel ({}, {}), pass {}. Setting to black.",
                        pixel.x, pixel.y, pass
                    );
                    l = Spectrum::ZERO;
                }

                film_tile.add_sample(&sample.camera.p_film, &l);
                arena.free_all();
            }

            film.merge_film_tile(film_tile);
        }

        if !task_sync.sync_threads_post_render(thread_id) {
            break;
        }

        if thread_id == 0 {
            film.incre_sample_count();
            film.scale_to_pixel();
            task_sync.reset_tasks();
            debug!("Pass {} of {} complete", pass + 1, ctx.samples_per_pixel);
        }
    }
}
