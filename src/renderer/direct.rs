use std::cell::UnsafeCell;

use anyhow::Context;

use crate::{
    camera::CameraT,
    core::{
        color::Color,
        film::{BoxFilter, Film, PixelBounds, UnsafeFilm},
        intersection::Intersection,
        loader::InputParams,
        ray::Ray,
        rng::Rng,
        scene::Scene,
    },
    direct::{CandidateBuilder, DirectLighting, DirectStrategy, ShadingPoint, StoppingRule},
    light::Light,
    material::{MaterialT, SpecularLobe},
    sampler::{Sampler, SamplerT},
};

use super::{util, OutputConfig, RendererT};

/// Renders direct lighting only. Each camera ray is shaded with the
/// candidate-based estimator, perfect specular surfaces are followed up to
/// `max_depth` bounces.
pub struct DirectLightingRenderer {
    max_depth: u32,
    strategy: DirectStrategy,
    rotate_candidates: bool,
    pixel_bounds: Option<PixelBounds>,
    seed: Option<u64>,
    sampler: Sampler,
    filter: BoxFilter,
}

impl DirectLightingRenderer {
    pub const DEFAULT_MAX_DEPTH: u32 = 5;
    /// Surfaces without a BSDF a single ray may cross before it is dropped.
    pub const MAX_PASS_THROUGH: u32 = 64;

    pub fn new(
        max_depth: u32,
        strategy: DirectStrategy,
        sampler: Sampler,
        filter: BoxFilter,
    ) -> Self {
        Self {
            max_depth,
            strategy,
            rotate_candidates: false,
            pixel_bounds: None,
            seed: None,
            sampler,
            filter,
        }
    }

    pub fn with_rotation(mut self, rotate_candidates: bool) -> Self {
        self.rotate_candidates = rotate_candidates;
        self
    }

    pub fn with_pixel_bounds(mut self, bounds: PixelBounds) -> Self {
        self.pixel_bounds = Some(bounds);
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn load(
        params: &mut InputParams,
        ty: &str,
        sampler: Sampler,
        filter: BoxFilter,
    ) -> anyhow::Result<Self> {
        let max_depth = params.get_int_or("max_depth", Self::DEFAULT_MAX_DEPTH as i32)?;
        if max_depth <= 0 {
            anyhow::bail!(format!("{} - 'max_depth' should be positive", params.name()));
        }

        let strategy = if ty == "adaptive" {
            let certainty = params.get_float_or("certainty", StoppingRule::DEFAULT_CERTAINTY)?;
            let tolerance = params.get_float_or("tolerance", StoppingRule::DEFAULT_TOLERANCE)?;
            let name = params.name().to_owned();
            let rule = StoppingRule::new(certainty, tolerance)
                .with_context(|| format!("{} - invalid stopping rule", name))?;
            DirectStrategy::Adaptive(rule)
        } else {
            DirectStrategy::Exhaustive
        };

        let rotate_candidates = params.get_bool_or("rotate_candidates", false)?;
        let mut renderer = Self::new(max_depth as u32, strategy, sampler, filter)
            .with_rotation(rotate_candidates);

        if params.contains_key("pixel_bounds") {
            let bounds = params.get_int_array("pixel_bounds")?;
            if bounds.len() != 4 || bounds.iter().any(|v| *v < 0) {
                anyhow::bail!(format!(
                    "{} - 'pixel_bounds' should be [x0, x1, y0, y1] of non-negative integers",
                    params.name()
                ));
            }
            let bounds = PixelBounds {
                x0: bounds[0] as u32,
                x1: bounds[1] as u32,
                y0: bounds[2] as u32,
                y1: bounds[3] as u32,
            };
            if bounds.x1 <= bounds.x0 || bounds.y1 <= bounds.y0 {
                anyhow::bail!(format!("{} - 'pixel_bounds' is empty", params.name()));
            }
            renderer = renderer.with_pixel_bounds(bounds);
        }

        if params.contains_key("seed") {
            let seed = params.get_int("seed")?;
            if seed < 0 {
                anyhow::bail!(format!("{} - 'seed' should be non-negative", params.name()));
            }
            renderer = renderer.with_seed(seed as u64);
        }

        Ok(renderer)
    }

    #[allow(clippy::too_many_arguments)]
    fn trace_ray(
        &self,
        scene: &Scene,
        lighting: &DirectLighting<Light>,
        ray: Ray,
        depth: u32,
        sampler: &mut Sampler,
        rng: &mut Rng,
        fresh: &mut Vec<(f32, f32)>,
    ) -> Color {
        let mut ray = ray;
        let mut crossed = 0;
        let (inter, surface) = loop {
            let mut inter = Intersection::default();
            if !scene.intersect(&ray, &mut inter) {
                return scene.escaped(&ray);
            }
            let instance = match inter.instance {
                Some(instance) => instance,
                None => return Color::BLACK,
            };
            if instance.surface().material().has_bsdf() {
                break (inter, instance.surface());
            }
            crossed += 1;
            if crossed > Self::MAX_PASS_THROUGH {
                return Color::BLACK;
            }
            ray = pass_through(&inter, &ray);
        };
        let material = surface.material();
        let wo = -ray.direction;

        let mut color = surface.emissive_towards(wo, inter.normal);

        fresh.clear();
        if self.rotate_candidates {
            for _ in 0..lighting.candidates().len() {
                fresh.push(sampler.get_2d(rng));
            }
        }
        let point = ShadingPoint {
            position: inter.position,
            normal: inter.normal,
            wo,
        };
        color += lighting.estimate(&point, material, scene, fresh);

        if depth + 1 < self.max_depth {
            for lobe in [SpecularLobe::Reflection, SpecularLobe::Transmission] {
                if let Some(samp) = material.sample_specular(wo, inter.normal, lobe) {
                    let ray = Ray::new(inter.position, samp.wi);
                    let li = self.trace_ray(scene, lighting, ray, depth + 1, sampler, rng, fresh);
                    color += samp.weight * li;
                }
            }
        }

        color
    }

    fn log_statistics(&self, lighting: &DirectLighting<Light>) {
        let stats = lighting.statistics();
        let totals = stats.totals();
        match self.strategy {
            DirectStrategy::Adaptive(rule) => log::info!(
                "certainty {}, tolerance {}: {} calls, {} shadow rays, {} unoccluded",
                rule.certainty(),
                rule.tolerance(),
                stats.batches(),
                totals.sampled,
                totals.hit
            ),
            DirectStrategy::Exhaustive => log::info!("exhaustive: every candidate was resolved"),
        }

        for (index, (cand, entry)) in lighting
            .candidates()
            .iter()
            .zip(stats.snapshot())
            .enumerate()
        {
            let rate = entry
                .hit_rate()
                .map_or_else(|| "-".to_owned(), |rate| format!("{:.3}", rate));
            log::debug!(
                "candidate #{} (light #{}): {}/{} unoccluded, rate {}",
                index,
                cand.light_index,
                entry.hit,
                entry.sampled,
                rate
            );
        }
    }
}

/// Continues `ray` behind a surface that doesn't scatter. The origin is pushed
/// along the ray in proportion to the hit's magnitude, so the same surface
/// isn't found again far from the origin.
fn pass_through(inter: &Intersection, ray: &Ray) -> Ray {
    let offset = Ray::T_MIN_EPS.max(inter.position.abs().max_element() * 1e-6);
    Ray::new(inter.position + ray.direction * offset, ray.direction)
}

impl RendererT for DirectLightingRenderer {
    fn render(&self, scene: &Scene, config: &OutputConfig) -> anyhow::Result<()> {
        let full = PixelBounds::full(config.width, config.height);
        let bounds = match &self.pixel_bounds {
            Some(window) => full.intersect(window),
            None => full,
        };
        if bounds.area() == 0 {
            anyhow::bail!(format!(
                "renderer - pixel bounds {:?} don't overlap the {}x{} image",
                self.pixel_bounds, config.width, config.height
            ));
        }

        let camera = scene.get_camera(&config.used_camera_name)?;

        let candidates = CandidateBuilder::new(&self.sampler, Rng::from_seed_or_entropy(self.seed))
            .build(scene.lights());
        log::info!(
            "{} candidates from {} lights, {} samples per pixel",
            candidates.len(),
            scene.lights().len(),
            self.sampler.spp()
        );
        let lighting =
            DirectLighting::new(candidates, self.strategy).with_rotation(self.rotate_candidates);

        let film = UnsafeCell::new(Film::new(config.width, config.height));
        let aspect = config.width as f32 / config.height as f32;

        let progress_bar = util::render_prograss_bar(bounds.width(), bounds.height());

        let num_cpus = num_cpus::get() as u32 * 2;
        let ranges = util::create_image_ranges(num_cpus, bounds.y0, bounds.y1);

        crossbeam::scope(|scope| {
            for (t, range) in ranges.iter().enumerate() {
                let width_inv = 1.0 / config.width as f32;
                let height_inv = 1.0 / config.height as f32;
                let mut sampler = self.sampler.clone();
                let film = UnsafeFilm::new(&film);
                let camera = camera.clone();
                let progress_bar = progress_bar.clone();
                let renderer = &self;
                let lighting = &lighting;
                let seed = self.seed.map(|seed| seed.wrapping_add(t as u64 + 1));
                let (from, to) = (range.from, range.to);

                scope.spawn(move |_| {
                    let mut rng = Rng::from_seed_or_entropy(seed);
                    let mut fresh = vec![];
                    for j in from..to {
                        for i in bounds.x0..bounds.x1 {
                            sampler.start_pixel();
                            while let Some((offset_x, offset_y)) = sampler.next_sample(&mut rng) {
                                let x = ((i as f32 + offset_x) * width_inv - 0.5) * aspect;
                                let y =
                                    ((config.height - j - 1) as f32 + offset_y) * height_inv - 0.5;
                                let ray = camera.generate_ray((x, y));
                                let color = renderer.trace_ray(
                                    scene,
                                    lighting,
                                    ray,
                                    0,
                                    &mut sampler,
                                    &mut rng,
                                    &mut fresh,
                                );
                                unsafe {
                                    film.add_sample(i, j, (offset_x - 0.5, offset_y - 0.5), color);
                                }
                            }
                            progress_bar.inc(1);
                        }
                    }
                });
            }
        })
        .map_err(|_| anyhow::anyhow!("renderer - a render thread panicked"))?;
        progress_bar.finish();

        self.log_statistics(&lighting);

        let film = film.into_inner();
        let image = film.filter_to_image(&self.filter);
        image
            .save(&config.output_filename)
            .with_context(|| format!("failed to save image to '{}'", config.output_filename))?;
        log::info!("image saved to '{}'", config.output_filename);

        Ok(())
    }
}
