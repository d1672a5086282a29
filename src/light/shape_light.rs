use std::sync::Arc;

use crate::{
    direct::{IncidentSample, ShadingPoint, VisibilityQuery},
    primitive::{Instance, PrimitiveT},
};

use super::LightT;

/// Area light made from an emissive instance.
pub struct ShapeLight {
    shape: Arc<Instance>,
}

impl ShapeLight {
    pub fn new(shape: Arc<Instance>) -> Self {
        Self { shape }
    }
}

impl LightT for ShapeLight {
    fn sample_incident(&self, point: &ShadingPoint, u: (f32, f32)) -> IncidentSample {
        let (position, normal) = self.shape.primitive().sample(u);
        let surface = self.shape.surface();

        let light_vec = position - point.position;
        let light_dist_sqr = light_vec.length_squared();
        if light_dist_sqr == 0.0 {
            return IncidentSample::none(point.position);
        }
        let light_dist = light_dist_sqr.sqrt();
        let light_dir = light_vec / light_dist;

        let cos = if surface.double_sided() {
            light_dir.dot(normal).abs()
        } else {
            light_dir.dot(-normal)
        };
        if cos <= 0.0 {
            return IncidentSample::none(point.position);
        }

        // area measure to solid angle
        let pdf = light_dist_sqr / (cos * self.shape.primitive().surface_area());
        IncidentSample {
            wi: light_dir,
            pdf,
            radiance: surface.emissive(),
            visibility: VisibilityQuery::new(point.position, light_dir, light_dist),
        }
    }

    fn n_samples(&self) -> u32 {
        self.shape.surface().light_samples()
    }

    fn is_delta(&self) -> bool {
        false
    }
}
