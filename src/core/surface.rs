use std::sync::Arc;

use crate::{core::color::Color, material::Material};

pub struct Surface {
    material: Arc<Material>,
    emissive: Color,
    double_sided: bool,
    light_samples: u32,
}

impl Surface {
    pub fn new(
        material: Arc<Material>,
        emissive: Color,
        double_sided: bool,
        light_samples: u32,
    ) -> Self {
        Self {
            material,
            emissive,
            double_sided,
            light_samples,
        }
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn is_emissive(&self) -> bool {
        self.emissive.luminance() > 0.0
    }

    pub fn emissive(&self) -> Color {
        self.emissive
    }

    /// Emitted radiance leaving the surface towards `wo`.
    pub fn emissive_towards(&self, wo: glam::Vec3A, normal: glam::Vec3A) -> Color {
        if self.double_sided || wo.dot(normal) > 0.0 {
            self.emissive
        } else {
            Color::BLACK
        }
    }

    pub fn double_sided(&self) -> bool {
        self.double_sided
    }

    /// Number of candidates drawn on the surface when it acts as a light.
    pub fn light_samples(&self) -> u32 {
        self.light_samples
    }
}
