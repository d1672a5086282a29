use std::{collections::HashMap, sync::Arc};

use crate::{
    camera::Camera,
    core::{color::Color, intersection::Intersection, ray::Ray},
    direct::{Occluder, VisibilityQuery},
    light::{Light, LightT},
    primitive::Group,
};

pub struct Scene {
    cameras: HashMap<String, Arc<Camera>>,
    aggregate: Group,
    lights: Vec<Arc<Light>>,
}

impl Scene {
    pub fn new(
        cameras: HashMap<String, Arc<Camera>>,
        aggregate: Group,
        lights: Vec<Arc<Light>>,
    ) -> Self {
        Self {
            cameras,
            aggregate,
            lights,
        }
    }

    pub fn get_camera(&self, name: &str) -> anyhow::Result<Arc<Camera>> {
        if let Some(camera) = self.cameras.get(name) {
            Ok(camera.clone())
        } else {
            anyhow::bail!(format!("There is no camera named '{}'", name))
        }
    }

    pub fn lights(&self) -> &[Arc<Light>] {
        &self.lights
    }

    pub fn intersect<'a>(&'a self, ray: &Ray, inter: &mut Intersection<'a>) -> bool {
        self.aggregate.intersect(ray, inter)
    }

    /// Radiance carried by a ray that leaves the scene.
    pub fn escaped(&self, ray: &Ray) -> Color {
        self.lights
            .iter()
            .fold(Color::BLACK, |acc, light| acc + light.le(ray))
    }
}

impl Occluder for Scene {
    fn is_unoccluded(&self, query: &VisibilityQuery) -> bool {
        let (shadow_ray, t_max) = query.shadow_ray();
        !self.aggregate.intersect_test(&shadow_ray, t_max)
    }
}
