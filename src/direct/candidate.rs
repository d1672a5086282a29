use std::sync::Arc;

use crate::{
    core::rng::Rng,
    sampler::{Sampler, SamplerT},
};

use super::LightSampler;

/// One fixed sample position on a light.
pub struct LightCandidate<L> {
    pub light: Arc<L>,
    pub light_index: usize,
    pub u: (f32, f32),
    /// `1 / n` for the `n` candidates drawn from the same light.
    pub weight: f32,
}

impl<L> Clone for LightCandidate<L> {
    fn clone(&self) -> Self {
        Self {
            light: self.light.clone(),
            light_index: self.light_index,
            u: self.u,
            weight: self.weight,
        }
    }
}

/// Draws the candidates of every light from a private copy of the render's
/// sampler, before any pixel is shaded.
pub struct CandidateBuilder {
    sampler: Sampler,
    rng: Rng,
}

impl CandidateBuilder {
    pub fn new(sampler: &Sampler, rng: Rng) -> Self {
        Self {
            sampler: sampler.clone(),
            rng,
        }
    }

    pub fn build<L: LightSampler>(mut self, lights: &[Arc<L>]) -> Vec<LightCandidate<L>> {
        let num_samples = lights
            .iter()
            .map(|light| self.sampler.round_count(light.sample_count().max(1)))
            .collect::<Vec<_>>();
        for &n in &num_samples {
            self.sampler.request_2d_array(n);
        }

        self.sampler.start_pixel();
        self.sampler.next_sample(&mut self.rng);

        let mut candidates = Vec::with_capacity(num_samples.iter().sum::<u32>() as usize);
        for (light_index, (light, &n)) in lights.iter().zip(num_samples.iter()).enumerate() {
            if let Some(array) = self.sampler.get_2d_array(n) {
                let weight = 1.0 / n as f32;
                candidates.extend(array.iter().map(|&u| LightCandidate {
                    light: light.clone(),
                    light_index,
                    u,
                    weight,
                }));
                log::debug!("light #{}: {} candidates", light_index, n);
            } else {
                log::debug!(
                    "light #{}: no array of {} samples, using one ad hoc sample",
                    light_index,
                    n
                );
                candidates.push(LightCandidate {
                    light: light.clone(),
                    light_index,
                    u: self.sampler.get_2d(&mut self.rng),
                    weight: 1.0,
                });
            }
        }

        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::color::Color,
        direct::{IncidentSample, ShadingPoint},
        sampler::{AdditiveRecurrenceSampler, JitteredSampler, RandomSampler},
    };

    struct CountedLight(u32);

    impl LightSampler for CountedLight {
        fn sample_incident(&self, point: &ShadingPoint, _u: (f32, f32)) -> IncidentSample {
            let mut sample = IncidentSample::none(point.position);
            sample.radiance = Color::WHITE;
            sample
        }

        fn sample_count(&self) -> u32 {
            self.0
        }
    }

    fn weights_per_light(candidates: &[LightCandidate<CountedLight>], light: usize) -> f32 {
        candidates
            .iter()
            .filter(|cand| cand.light_index == light)
            .map(|cand| cand.weight)
            .sum()
    }

    #[test]
    fn weights_of_one_light_sum_to_one() {
        let lights = vec![Arc::new(CountedLight(3)), Arc::new(CountedLight(1))];
        let sampler: Sampler = RandomSampler::new(1).into();
        let candidates = CandidateBuilder::new(&sampler, Rng::with_seed(3)).build(&lights);

        assert_eq!(candidates.len(), 4);
        assert!((weights_per_light(&candidates, 0) - 1.0).abs() < 1e-6);
        assert!((weights_per_light(&candidates, 1) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn sample_counts_follow_sampler_rounding() {
        let lights = vec![Arc::new(CountedLight(3)), Arc::new(CountedLight(5))];
        let sampler: Sampler = JitteredSampler::new(2, 2).into();
        let candidates = CandidateBuilder::new(&sampler, Rng::with_seed(3)).build(&lights);

        let count = |light| candidates.iter().filter(|c| c.light_index == light).count();
        assert_eq!(count(0), 4);
        assert_eq!(count(1), 9);
        assert!(candidates
            .iter()
            .all(|c| (0.0..1.0).contains(&c.u.0) && (0.0..1.0).contains(&c.u.1)));
    }

    #[test]
    fn missing_arrays_fall_back_to_one_candidate() {
        let lights = vec![Arc::new(CountedLight(4)), Arc::new(CountedLight(2))];
        let sampler: Sampler = AdditiveRecurrenceSampler::new(1).into();
        let candidates = CandidateBuilder::new(&sampler, Rng::with_seed(3)).build(&lights);

        assert_eq!(candidates.len(), 2);
        assert!(candidates.iter().all(|c| c.weight == 1.0));
        assert_eq!(candidates[0].light_index, 0);
        assert_eq!(candidates[1].light_index, 1);
    }

    #[test]
    fn no_lights_no_candidates() {
        let lights: Vec<Arc<CountedLight>> = vec![];
        let sampler: Sampler = RandomSampler::new(1).into();
        assert!(CandidateBuilder::new(&sampler, Rng::with_seed(3))
            .build(&lights)
            .is_empty());
    }
}
