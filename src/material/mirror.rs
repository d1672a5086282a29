use crate::core::{color::Color, loader::InputParams};

use super::{util, MaterialT, SpecularLobe, SpecularSample};

pub struct Mirror {
    reflectance: Color,
}

impl Mirror {
    pub fn new(reflectance: Color) -> Self {
        Self { reflectance }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let reflectance = params.get_float3_or("reflectance", [1.0, 1.0, 1.0])?;
        Ok(Self::new(reflectance.into()))
    }
}

impl MaterialT for Mirror {
    fn sample_specular(
        &self,
        wo: glam::Vec3A,
        normal: glam::Vec3A,
        lobe: SpecularLobe,
    ) -> Option<SpecularSample> {
        match lobe {
            SpecularLobe::Reflection => Some(SpecularSample {
                wi: util::reflect_n(wo, normal),
                weight: self.reflectance,
            }),
            SpecularLobe::Transmission => None,
        }
    }
}
