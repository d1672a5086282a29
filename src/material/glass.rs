use crate::core::{color::Color, loader::InputParams};

use super::{util, MaterialT, SpecularLobe, SpecularSample};

/// Smooth dielectric. Both lobes are traced, each weighted by its Fresnel share.
pub struct Glass {
    reflectance: Color,
    transmittance: Color,
    ior: f32,
}

impl Glass {
    pub fn new(reflectance: Color, transmittance: Color, ior: f32) -> Self {
        Self {
            reflectance,
            transmittance,
            ior,
        }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let reflectance = params.get_float3_or("reflectance", [1.0, 1.0, 1.0])?;
        let transmittance = params.get_float3_or("transmittance", [1.0, 1.0, 1.0])?;
        let ior = params.get_float_or("ior", 1.5)?;
        if ior <= 0.0 {
            anyhow::bail!(format!("{} - 'ior' should be positive", params.name()));
        }

        Ok(Self::new(reflectance.into(), transmittance.into(), ior))
    }
}

impl MaterialT for Glass {
    fn sample_specular(
        &self,
        wo: glam::Vec3A,
        normal: glam::Vec3A,
        lobe: SpecularLobe,
    ) -> Option<SpecularSample> {
        let fresnel = util::fresnel_n(self.ior, wo, normal);
        match lobe {
            SpecularLobe::Reflection => Some(SpecularSample {
                wi: util::reflect_n(wo, normal),
                weight: self.reflectance * fresnel,
            }),
            SpecularLobe::Transmission => util::refract_n(wo, normal, self.ior).map(|wi| {
                let k = util::ior_ratio(wo.dot(normal), self.ior);
                SpecularSample {
                    wi,
                    weight: self.transmittance * ((1.0 - fresnel) * k * k),
                }
            }),
        }
    }
}
