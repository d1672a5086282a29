use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use crate::{
    camera::Camera,
    core::scene::Scene,
    light::{Light, LightT, ShapeLight},
    material::Material,
    primitive::{Group, Instance, Primitive},
};

/// Named objects collected while loading, before the scene is assembled.
///
/// Instances and lights are kept ordered by name so that the light list, and
/// with it the candidate list, does not depend on hashing.
#[derive(Default)]
pub struct SceneResources {
    cameras: HashMap<String, Arc<Camera>>,
    instances: BTreeMap<String, Arc<Instance>>,
    primitives: HashMap<String, Arc<Primitive>>,
    materials: HashMap<String, Arc<Material>>,
    lights: BTreeMap<String, Arc<Light>>,
}

impl SceneResources {
    pub fn to_scene(self) -> anyhow::Result<Scene> {
        if self.cameras.is_empty() {
            anyhow::bail!("At least one camera is needed");
        }

        let mut lights = self.lights.values().cloned().collect::<Vec<_>>();
        for instance in self.instances.values() {
            if instance.surface().is_emissive() {
                let light = ShapeLight::new(instance.clone());
                lights.push(Arc::new(light.into()));
            }
        }

        let aggregate = Group::new(self.instances.values().cloned().collect());

        log::info!(
            "{} instances, {} lights ({} delta)",
            aggregate.instances().len(),
            lights.len(),
            lights.iter().filter(|light| light.is_delta()).count()
        );

        Ok(Scene::new(self.cameras, aggregate, lights))
    }

    pub fn add_camera(&mut self, name: String, camera: Camera) -> anyhow::Result<()> {
        if self.cameras.contains_key(&name) {
            anyhow::bail!(format!("Duplicated camera name '{}'", name));
        } else {
            self.cameras.insert(name, Arc::new(camera));
            Ok(())
        }
    }

    pub fn add_light(&mut self, name: String, light: Light) -> anyhow::Result<()> {
        if self.lights.contains_key(&name) {
            anyhow::bail!(format!("Duplicated light name '{}'", name));
        } else {
            self.lights.insert(name, Arc::new(light));
            Ok(())
        }
    }

    pub fn add_instance(&mut self, name: String, instance: Instance) -> anyhow::Result<()> {
        if self.instances.contains_key(&name) {
            anyhow::bail!(format!("Duplicated instance name '{}'", name));
        } else {
            self.instances.insert(name, Arc::new(instance));
            Ok(())
        }
    }

    pub fn add_material(&mut self, name: String, material: Material) -> anyhow::Result<()> {
        if self.materials.contains_key(&name) {
            anyhow::bail!(format!("Duplicated material name '{}'", name));
        } else {
            self.materials.insert(name, Arc::new(material));
            Ok(())
        }
    }

    pub fn clone_material(&self, name: String) -> anyhow::Result<Arc<Material>> {
        if let Some(material) = self.materials.get(&name) {
            Ok(material.clone())
        } else {
            anyhow::bail!(format!("There is no material named '{}'", name))
        }
    }

    pub fn add_primitive(&mut self, name: String, primitive: Primitive) -> anyhow::Result<()> {
        if self.primitives.contains_key(&name) {
            anyhow::bail!(format!("Duplicated primitive name '{}'", name));
        } else {
            self.primitives.insert(name, Arc::new(primitive));
            Ok(())
        }
    }

    pub fn clone_primitive(&self, name: String) -> anyhow::Result<Arc<Primitive>> {
        if let Some(primitive) = self.primitives.get(&name) {
            Ok(primitive.clone())
        } else {
            anyhow::bail!(format!("There is no primitive named '{}'", name))
        }
    }
}
