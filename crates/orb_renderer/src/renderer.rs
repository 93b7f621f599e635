//! Path integrator and the single-threaded image loop.
//!
//! Each sample follows one path: the primary ray bounces until it misses the
//! scene, is absorbed, or runs out of bounces. The sky gradient is the only
//! light source, weighted by the product of the attenuations collected on
//! the way.

use orb_core::{Color, Scene};
use orb_math::Ray;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use crate::camera::Camera;
use crate::error::RenderResult;
use crate::hittable::HitRecord;
use crate::material::scatter;
use crate::output::ImageBuffer;
use crate::sampling::gen_f32;
use crate::settings::RenderSettings;
use crate::traversal::{find_closest_hit, TraversalStack};

/// Offset applied to `t_min` so bounced rays do not re-hit their origin.
pub const BOUNCE_EPSILON: f32 = 0.001;

const SKY_BLUE: Color = Color::new(0.5, 0.7, 1.0);

/// Sky gradient seen by a ray that leaves the scene.
pub fn background(ray: &Ray) -> Color {
    let unit_direction = ray.direction.normalize_or_zero();
    let a = 0.5 * (unit_direction.y + 1.0);
    Color::ONE * (1.0 - a) + SKY_BLUE * a
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Gamma-correct and quantize a linear color to 8 bits per channel.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let quantize = |c: f32| (255.99 * linear_to_gamma(c).clamp(0.0, 1.0)) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Scene plus the traversal scratch space needed to trace rays through it.
///
/// One per worker: the scene is only borrowed, the stack is owned.
pub struct Tracer<'s> {
    scene: &'s Scene,
    stack: TraversalStack,
}

impl<'s> Tracer<'s> {
    pub fn new(scene: &'s Scene) -> Self {
        Self {
            scene,
            stack: TraversalStack::for_scene(scene),
        }
    }

    pub fn find_closest_hit(&mut self, ray: &Ray, t_min: f32, t_max: f32) -> Option<HitRecord> {
        find_closest_hit(self.scene, ray, t_min, t_max, &mut self.stack)
    }

    /// Radiance carried back along one camera path through `(s, t)`.
    ///
    /// An absorbed path is black. A path still bouncing when `max_bounces`
    /// runs out is weighted against the background in its last direction.
    pub fn sample_color(
        &mut self,
        camera: &Camera,
        max_bounces: u32,
        s: f32,
        t: f32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let mut ray = camera.generate_ray(s, t, rng);
        let mut fraction = Color::ONE;

        for _ in 0..max_bounces {
            let Some(rec) = self.find_closest_hit(&ray, BOUNCE_EPSILON, f32::MAX) else {
                break;
            };
            match scatter(self.scene, &ray, &rec, rng) {
                Some(result) => {
                    fraction *= result.attenuation;
                    ray = result.scattered;
                }
                None => return Color::ZERO,
            }
        }

        fraction * background(&ray)
    }
}

/// Render one pixel with `samples_per_pixel` jittered samples.
///
/// `y` counts rows upwards from the bottom of the image, matching the
/// camera's `(s, t)` convention.
pub fn render_pixel(
    tracer: &mut Tracer,
    camera: &Camera,
    settings: &RenderSettings,
    x: u32,
    y: u32,
    rng: &mut dyn RngCore,
) -> [u8; 3] {
    let width = settings.width as f32;
    let height = settings.height as f32;

    let mut pixel_color = Color::ZERO;
    for _ in 0..settings.samples_per_pixel {
        let s = (x as f32 + gen_f32(rng)) / width;
        let t = (y as f32 + gen_f32(rng)) / height;
        pixel_color += tracer.sample_color(camera, settings.max_bounces, s, t, rng);
    }

    color_to_rgb(pixel_color / settings.samples_per_pixel.max(1) as f32)
}

/// Everything needed to render a frame.
pub struct Renderer {
    scene: Scene,
    camera: Camera,
    settings: RenderSettings,
}

impl Renderer {
    pub fn new(scene: Scene, settings: RenderSettings) -> RenderResult<Self> {
        settings.validate()?;
        Ok(Self {
            camera: settings.camera(),
            scene,
            settings,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    pub fn tracer(&self) -> Tracer<'_> {
        Tracer::new(&self.scene)
    }

    /// Random stream for a single pixel, fixed by the settings seed.
    ///
    /// Any pixel re-renders bit-identically regardless of render order.
    pub fn pixel_rng(&self, x: u32, y: u32) -> StdRng {
        let pixel = ((y as u64) << 32) | x as u64;
        StdRng::seed_from_u64(self.settings.seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ pixel)
    }

    /// Render the pixel at column `x`, row `y` counted from the top.
    ///
    /// Panics if `(x, y)` lies outside the image.
    pub fn render_pixel(&self, tracer: &mut Tracer, x: u32, y: u32) -> [u8; 3] {
        assert!(
            x < self.settings.width && y < self.settings.height,
            "pixel ({x}, {y}) outside {}x{} image",
            self.settings.width,
            self.settings.height
        );
        let mut rng = self.pixel_rng(x, y);
        let row_from_bottom = self.settings.height - 1 - y;
        render_pixel(tracer, &self.camera, &self.settings, x, row_from_bottom, &mut rng)
    }

    /// Render the full frame, top row first.
    pub fn render(&self) -> ImageBuffer {
        let width = self.settings.width;
        let height = self.settings.height;
        let mut image = ImageBuffer::new(width, height);
        let mut tracer = self.tracer();

        log::info!(
            "Rendering {}x{} at {} spp, {} bounces",
            width,
            height,
            self.settings.samples_per_pixel,
            self.settings.max_bounces
        );

        let step = (height / 10).max(1);
        for y in 0..height {
            for x in 0..width {
                image.set(x, y, self.render_pixel(&mut tracer, x, y));
            }
            if (y + 1) % step == 0 || y + 1 == height {
                log::info!("Progress: {}%", (y + 1) * 100 / height);
            }
        }

        image
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::CameraSettings;
    use orb_core::{MaterialDesc, SceneBuilder};
    use orb_math::Vec3;

    fn small_settings() -> RenderSettings {
        RenderSettings {
            width: 8,
            height: 6,
            samples_per_pixel: 4,
            max_bounces: 4,
            seed: 99,
            camera: CameraSettings {
                eye: Vec3::new(0.0, 0.0, 3.0),
                target: Vec3::ZERO,
                up: Vec3::Y,
                vfov: 60.0,
                aperture: 0.0,
                focus_distance: 3.0,
            },
        }
    }

    fn one_sphere(material: MaterialDesc) -> Scene {
        let mut builder = SceneBuilder::new();
        builder.add_sphere(Vec3::ZERO, 1.0, material).unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_background_gradient() {
        let up = background(&Ray::new(Vec3::ZERO, Vec3::Y));
        let down = background(&Ray::new(Vec3::ZERO, Vec3::NEG_Y));
        let level = background(&Ray::new(Vec3::ZERO, Vec3::X));

        assert!((up - SKY_BLUE).length() < 1e-6);
        assert!((down - Color::ONE).length() < 1e-6);
        assert!((level - Color::new(0.75, 0.85, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_background_ignores_direction_length() {
        let short = background(&Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.3, 0.4)));
        let long = background(&Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0)));
        assert!((short - long).length() < 1e-6);
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-4);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_color_to_rgb() {
        assert_eq!(color_to_rgb(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_rgb(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::splat(4.0)), [255, 255, 255]);
        assert_eq!(color_to_rgb(Color::new(0.25, -1.0, 1.0)), [127, 0, 255]);
    }

    #[test]
    fn test_zero_bounces_is_background() {
        let scene = one_sphere(MaterialDesc::lambertian(Color::splat(0.5)));
        let camera = small_settings().camera();
        let mut tracer = Tracer::new(&scene);
        let mut rng = StdRng::seed_from_u64(1);

        for &(s, t) in &[(0.5, 0.5), (0.1, 0.9), (0.7, 0.2)] {
            let color = tracer.sample_color(&camera, 0, s, t, &mut rng);
            // A pinhole camera draws nothing from the stream
            let expected = background(&camera.generate_ray(s, t, &mut rng));
            assert!((color - expected).length() < 1e-6);
        }
    }

    #[test]
    fn test_empty_scene_is_background() {
        let scene = Scene::empty();
        let camera = small_settings().camera();
        let mut tracer = Tracer::new(&scene);
        let mut rng = StdRng::seed_from_u64(2);

        let color = tracer.sample_color(&camera, 8, 0.5, 0.5, &mut rng);
        let expected = background(&camera.generate_ray(0.5, 0.5, &mut rng));
        assert!((color - expected).length() < 1e-6);
    }

    #[test]
    fn test_mirror_reflects_sky_back_at_camera() {
        // The centre ray hits the mirror head-on and escapes back along +Z.
        let scene = one_sphere(MaterialDesc::metallic(Color::new(0.5, 0.5, 0.5)));
        let camera = small_settings().camera();
        let mut tracer = Tracer::new(&scene);
        let mut rng = StdRng::seed_from_u64(3);

        let color = tracer.sample_color(&camera, 4, 0.5, 0.5, &mut rng);
        let level = background(&Ray::new(Vec3::ZERO, Vec3::Z));
        assert!((color - 0.5 * level).length() < 1e-4);
    }

    #[test]
    fn test_exhausted_bounces_keep_attenuated_background() {
        let scene = one_sphere(MaterialDesc::metallic(Color::splat(0.5)));
        let camera = small_settings().camera();
        let mut tracer = Tracer::new(&scene);
        let mut rng = StdRng::seed_from_u64(4);

        // One bounce: the mirror hit scatters, then the budget runs out.
        let color = tracer.sample_color(&camera, 1, 0.5, 0.5, &mut rng);
        let level = background(&Ray::new(Vec3::ZERO, Vec3::Z));
        assert!((color - 0.5 * level).length() < 1e-4);
    }

    #[test]
    fn test_render_pixel_is_idempotent() {
        let scene = one_sphere(MaterialDesc::dielectric(1.5));
        let renderer = Renderer::new(scene, small_settings()).unwrap();
        let mut tracer = renderer.tracer();

        for &(x, y) in &[(0, 0), (3, 2), (7, 5)] {
            let first = renderer.render_pixel(&mut tracer, x, y);
            let second = renderer.render_pixel(&mut tracer, x, y);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_render_is_reproducible() {
        let settings = small_settings();
        let a = Renderer::new(one_sphere(MaterialDesc::lambertian(Color::splat(0.7))), settings.clone())
            .unwrap()
            .render();
        let b = Renderer::new(one_sphere(MaterialDesc::lambertian(Color::splat(0.7))), settings)
            .unwrap()
            .render();

        assert_eq!(a.width(), 8);
        assert_eq!(a.height(), 6);
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_empty_scene_shows_sky() {
        let renderer = Renderer::new(Scene::empty(), small_settings()).unwrap();
        let image = renderer.render();

        // Top row looks higher into the sky, so it is bluer than the bottom row
        let top = image.get(4, 0);
        let bottom = image.get(4, 5);
        assert!(top[0] < bottom[0]);
        assert_eq!(top[2], 255);
    }

    #[test]
    fn test_renderer_rejects_invalid_settings() {
        let mut settings = small_settings();
        settings.width = 0;
        assert!(Renderer::new(Scene::empty(), settings).is_err());
    }

    #[test]
    #[should_panic(expected = "outside 8x6 image")]
    fn test_render_pixel_rejects_row_past_bottom() {
        let renderer = Renderer::new(Scene::empty(), small_settings()).unwrap();
        let mut tracer = renderer.tracer();
        renderer.render_pixel(&mut tracer, 0, 6);
    }

    #[test]
    fn test_pixel_streams_differ() {
        let renderer = Renderer::new(Scene::empty(), small_settings()).unwrap();
        let a = renderer.pixel_rng(1, 0).next_u64();
        let b = renderer.pixel_rng(0, 1).next_u64();
        assert_ne!(a, b);
    }
}
