//! The API

#[macro_use]
extern crate log;

use engine::error::*;
use engine::estimator::*;
use engine::film::*;
use engine::filter::*;
use engine::parallel::*;
use engine::renderer::*;
use engine::sampler::*;
use engine::scene::*;
use engine::spectrum::*;
use filters::*;
use integrators::*;
use samplers::*;
use std::sync::Arc;

/// Number of occlusion rays traced by the ambient occlusion estimator.
pub const AO_SAMPLES: usize = 16;

/// Returns a reconstruction filter of the given kind.
///
/// * `filter_type` - The filter kind.
pub fn create_filter(filter_type: FilterType) -> ArcFilter {
    default_filter(filter_type)
}

/// Returns a sampler of the given kind.
///
/// * `sampler_type`      - The sampler kind.
/// * `samples_per_pixel` - Number of sampling passes.
pub fn create_sampler(sampler_type: SamplerType, samples_per_pixel: usize) -> ArcSampler {
    match sampler_type {
        SamplerType::Random => Arc::new(RandomSampler::new()),
        SamplerType::Stratified => Arc::new(StratifiedSampler::new(samples_per_pixel, true)),
    }
}

/// Returns an estimator of the given kind.
///
/// * `estimator_type`  - The estimator kind.
/// * `max_path_length` - Maximum bounces for the path estimator.
pub fn create_estimator(estimator_type: EstimatorType, max_path_length: usize) -> Box<dyn Estimator + Send + Sync> {
    match estimator_type {
        EstimatorType::Constant => Box::new(ConstantEstimator::new(Spectrum::ONE)),
        EstimatorType::Normals => Box::new(NormalsEstimator::new()),
        EstimatorType::AmbientOcclusion => Box::new(AmbientOcclusionEstimator::new(AO_SAMPLES, engine::base::INFINITY)),
        EstimatorType::Path => Box::new(PathEstimator::new(max_path_length)),
    }
}

/// Returns the film post-process used when denoising is enabled.
///
/// * `denoise` - Whether the job asks for denoising.
pub fn create_post_process(denoise: bool) -> Option<ArcFilmPostProcess> {
    if denoise {
        Some(Arc::new(OutlierRejection::default()))
    } else {
        None
    }
}

/// Assemble the collaborators named by a job.
///
/// * `job` - The job description.
pub fn create_components(job: &RenderJobDesc) -> RenderComponents {
    RenderComponents {
        filter: create_filter(job.filter),
        sampler: create_sampler(job.sampler, job.samples_per_pixel),
        estimator: create_estimator(job.estimator, job.max_path_length),
        post_process: create_post_process(job.denoise),
    }
}

/// Create a renderer for a job, sizing the worker pool from the job or the
/// hardware.
///
/// * `job`   - The job description.
/// * `scene` - The scene.
pub fn create_renderer(job: RenderJobDesc, scene: Box<dyn Scene + Send + Sync>) -> Result<Renderer, RenderError> {
    let scheduler = match job.thread_count {
        Some(n) => ThreadScheduler::new(n)?,
        None => ThreadScheduler::with_hardware_concurrency()?,
    };
    debug!("Created scheduler with {} threads", scheduler.thread_count());
    Renderer::new(job, scene, create_components(&job), scheduler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::camera::*;
    use shapes::*;

    #[test]
    fn every_kind_has_a_factory() {
        for t in [SamplerType::Random, SamplerType::Stratified] {
            let _ = create_sampler(t, 4);
        }
        for t in [
            EstimatorType::Constant,
            EstimatorType::Normals,
            EstimatorType::AmbientOcclusion,
            EstimatorType::Path,
        ] {
            let _ = create_estimator(t, 3);
        }
        assert!(create_post_process(true).is_some());
        assert!(create_post_process(false).is_none());
    }

    #[test]
    fn renders_constant_image() {
        let job = RenderJobDesc {
            width: 8,
            height: 6,
            samples_per_pixel: 2,
            estimator: EstimatorType::Constant,
            sampler: SamplerType::Random,
            filter: FilterType::Box,
            thread_count: Some(2),
            camera: CameraParams::default(),
            ..RenderJobDesc::default()
        };
        let scene = Box::new(SphereScene::new(vec![], Spectrum::ZERO));
        let mut renderer = create_renderer(job, scene).unwrap();
        renderer.queue_render_tasks().unwrap();
        renderer.wait().unwrap();

        assert_eq!(renderer.completed_passes(), 2);
        let image = renderer.frame_buffer();
        assert_eq!(image.len(), 48);
        assert!(image.iter().all(|s| *s == Spectrum::ONE));
    }

    #[test]
    fn constant_image_is_exact_with_every_filter() {
        let default_filter = RenderJobDesc::default().filter;
        for filter in [
            default_filter,
            FilterType::MitchellNetravali,
            FilterType::Triangle,
            FilterType::Gaussian,
            FilterType::Box,
        ] {
            let job = RenderJobDesc {
                width: 13,
                height: 9,
                samples_per_pixel: 4,
                estimator: EstimatorType::Constant,
                sampler: SamplerType::Stratified,
                filter,
                thread_count: Some(4),
                tile_size: 4,
                ..RenderJobDesc::default()
            };
            let scene = Box::new(SphereScene::new(vec![], Spectrum::ZERO));
            let mut renderer = create_renderer(job, scene).unwrap();
            renderer.queue_render_tasks().unwrap();
            renderer.wait().unwrap();

            for (i, s) in renderer.frame_buffer().iter().enumerate() {
                assert_eq!(*s, Spectrum::ONE, "{:?} filter, pixel {}", filter, i);
            }
        }
    }

    #[test]
    fn zero_threads_is_rejected() {
        let job = RenderJobDesc {
            thread_count: Some(0),
            ..RenderJobDesc::default()
        };
        let scene = Box::new(SphereScene::new(vec![], Spectrum::ZERO));
        assert!(matches!(
            create_renderer(job, scene),
            Err(RenderError::InvalidThreadCount)
        ));
    }
}
