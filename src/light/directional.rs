use crate::{
    core::{color::Color, loader::InputParams},
    direct::{IncidentSample, ShadingPoint, VisibilityQuery},
};

use super::LightT;

pub struct DirLight {
    direction: glam::Vec3A,
    strength: Color,
    samples: u32,
}

impl DirLight {
    pub fn new(direction: glam::Vec3A, strength: Color, samples: u32) -> Self {
        Self {
            direction: direction.normalize(),
            strength,
            samples,
        }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let direction = params.get_float3("direction")?.into();
        let strength = params.get_float3("strength")?.into();
        let samples = super::load_samples(params)?;

        Ok(Self::new(direction, strength, samples))
    }
}

impl LightT for DirLight {
    fn sample_incident(&self, point: &ShadingPoint, _u: (f32, f32)) -> IncidentSample {
        IncidentSample {
            wi: -self.direction,
            pdf: 1.0,
            radiance: self.strength,
            visibility: VisibilityQuery::new(point.position, -self.direction, f32::MAX),
        }
    }

    fn n_samples(&self) -> u32 {
        self.samples
    }

    fn is_delta(&self) -> bool {
        true
    }
}
