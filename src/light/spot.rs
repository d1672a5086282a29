use crate::{
    core::{color::Color, loader::InputParams},
    direct::{IncidentSample, ShadingPoint},
};

use super::LightT;

pub struct SpotLight {
    position: glam::Vec3A,
    direction: glam::Vec3A,
    cos_inner_angle: f32,
    cos_outer_angle: f32,
    strength: Color,
    samples: u32,
}

impl SpotLight {
    pub fn new(
        position: glam::Vec3A,
        direction: glam::Vec3A,
        inner_angle: f32,
        outer_angle: f32,
        strength: Color,
        samples: u32,
    ) -> Self {
        Self {
            position,
            direction: direction.normalize(),
            cos_inner_angle: inner_angle.cos(),
            cos_outer_angle: outer_angle.cos(),
            strength,
            samples,
        }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let position = params.get_float3("position")?.into();
        let direction = params.get_float3("direction")?.into();
        let inner_angle_deg = params.get_float_or("inner_angle", 0.0)?;
        let inner_angle = inner_angle_deg * std::f32::consts::PI / 180.0;
        let outer_angle_deg = params.get_float_or("outer_angle", 90.0)?;
        let outer_angle = outer_angle_deg * std::f32::consts::PI / 180.0;
        let strength = params.get_float3("strength")?.into();
        let samples = super::load_samples(params)?;

        Ok(Self::new(
            position,
            direction,
            inner_angle,
            outer_angle,
            strength,
            samples,
        ))
    }

    fn strength(&self, wi: glam::Vec3A) -> Color {
        let atten = ((self.direction.dot(-wi) - self.cos_outer_angle)
            / (self.cos_inner_angle - self.cos_outer_angle).max(0.0001))
        .clamp(0.0, 1.0);
        self.strength * atten
    }
}

impl LightT for SpotLight {
    fn sample_incident(&self, point: &ShadingPoint, _u: (f32, f32)) -> IncidentSample {
        let mut sample = super::sample_towards(point, self.position, Color::WHITE);
        sample.radiance *= self.strength(sample.wi);
        sample
    }

    fn n_samples(&self) -> u32 {
        self.samples
    }

    fn is_delta(&self) -> bool {
        true
    }
}
