use crate::core::{color::Color, loader::InputParams};

use super::MaterialT;

pub struct Lambert {
    albedo: Color,
}

impl Lambert {
    pub fn new(albedo: Color) -> Self {
        Self { albedo }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let albedo = params.get_float3("albedo")?;
        Ok(Self::new(albedo.into()))
    }
}

impl MaterialT for Lambert {
    fn evaluate(&self, wo: glam::Vec3A, wi: glam::Vec3A, normal: glam::Vec3A) -> Color {
        if wo.dot(normal) * wi.dot(normal) > 0.0 {
            self.albedo * std::f32::consts::FRAC_1_PI
        } else {
            Color::BLACK
        }
    }
}
