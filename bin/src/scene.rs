//! Demo scene

use engine::geometry::*;
use engine::spectrum::*;
use shapes::*;

/// Returns a ground sphere, three coloured spheres and a small emitter under
/// a sky gradient.
pub fn demo_scene() -> SphereScene {
    let spheres = vec![
        // Ground.
        Sphere::new(Point3f::new(0.0, -1000.0, 0.0), 1000.0, Spectrum::new(0.5)),
        Sphere::new(Point3f::new(-2.1, 1.0, 0.0), 1.0, Spectrum::from_rgb(0.8, 0.3, 0.3)),
        Sphere::new(Point3f::new(0.0, 1.0, 0.0), 1.0, Spectrum::from_rgb(0.3, 0.8, 0.3)),
        Sphere::new(Point3f::new(2.1, 1.0, 0.0), 1.0, Spectrum::from_rgb(0.3, 0.3, 0.8)),
        // Light.
        Sphere::new(Point3f::new(0.0, 3.5, -1.0), 0.5, Spectrum::ZERO).with_emission(Spectrum::new(8.0)),
    ];
    SphereScene::new(spheres, Spectrum::ZERO).with_sky(Spectrum::ONE, Spectrum::from_rgb(0.5, 0.7, 1.0))
}
