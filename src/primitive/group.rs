use std::sync::Arc;

use crate::core::{intersection::Intersection, ray::Ray};

use super::Instance;

/// Linear list of instances, tested one after another.
pub struct Group {
    instances: Vec<Arc<Instance>>,
}

impl Group {
    pub fn new(instances: Vec<Arc<Instance>>) -> Self {
        Self { instances }
    }

    pub fn instances(&self) -> &[Arc<Instance>] {
        &self.instances
    }

    pub fn intersect_test(&self, ray: &Ray, t_max: f32) -> bool {
        self.instances
            .iter()
            .any(|inst| inst.intersect_test(ray, t_max))
    }

    pub fn intersect<'a>(&'a self, ray: &Ray, inter: &mut Intersection<'a>) -> bool {
        let mut result = false;
        for inst in &self.instances {
            result |= inst.intersect(ray, inter);
        }
        result
    }
}
