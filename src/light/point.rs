use crate::{
    core::{color::Color, loader::InputParams},
    direct::{IncidentSample, ShadingPoint},
};

use super::LightT;

pub struct PointLight {
    position: glam::Vec3A,
    strength: Color,
    samples: u32,
}

impl PointLight {
    pub fn new(position: glam::Vec3A, strength: Color, samples: u32) -> Self {
        Self {
            position,
            strength,
            samples,
        }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let position = params.get_float3("position")?.into();
        let strength = params.get_float3("strength")?.into();
        let samples = super::load_samples(params)?;

        Ok(Self::new(position, strength, samples))
    }
}

impl LightT for PointLight {
    fn sample_incident(&self, point: &ShadingPoint, _u: (f32, f32)) -> IncidentSample {
        super::sample_towards(point, self.position, self.strength)
    }

    fn n_samples(&self) -> u32 {
        self.samples
    }

    fn is_delta(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_off_with_squared_distance() {
        let light = PointLight::new(glam::Vec3A::new(0.0, 2.0, 0.0), Color::gray(8.0), 1);
        let point = ShadingPoint {
            position: glam::Vec3A::ZERO,
            normal: glam::Vec3A::Y,
            wo: glam::Vec3A::Y,
        };
        let sample = light.sample_incident(&point, (0.5, 0.5));
        assert_eq!(sample.pdf, 1.0);
        assert_eq!(sample.radiance, Color::gray(2.0));
        assert!((sample.wi - glam::Vec3A::Y).length() < 1e-6);
        assert!((sample.visibility.distance - 2.0).abs() < 1e-6);
    }
}
