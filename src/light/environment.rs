use crate::{
    core::{color::Color, loader::InputParams, ray::Ray, rng},
    direct::{IncidentSample, ShadingPoint, VisibilityQuery},
};

use super::LightT;

/// Constant radiance arriving from every direction at infinity.
pub struct EnvLight {
    radiance: Color,
    samples: u32,
}

impl EnvLight {
    pub fn new(radiance: Color, samples: u32) -> Self {
        Self { radiance, samples }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let radiance = params.get_float3("radiance")?.into();
        let samples = super::load_samples(params)?;

        Ok(Self::new(radiance, samples))
    }
}

impl LightT for EnvLight {
    fn sample_incident(&self, point: &ShadingPoint, u: (f32, f32)) -> IncidentSample {
        let wi = rng::uniform_on_sphere(u);
        IncidentSample {
            wi,
            pdf: 0.25 * std::f32::consts::FRAC_1_PI,
            radiance: self.radiance,
            visibility: VisibilityQuery::new(point.position, wi, f32::MAX),
        }
    }

    fn le(&self, _ray: &Ray) -> Color {
        self.radiance
    }

    fn n_samples(&self) -> u32 {
        self.samples
    }

    fn is_delta(&self) -> bool {
        false
    }
}
