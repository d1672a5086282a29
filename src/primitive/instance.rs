use std::sync::Arc;

use crate::core::{
    intersection::Intersection, loader::InputParams, ray::Ray, scene_resources::SceneResources,
    surface::Surface,
};

use super::{Primitive, PrimitiveT};

pub struct Instance {
    primitive: Arc<Primitive>,
    surface: Surface,
}

impl Instance {
    pub fn new(primitive: Arc<Primitive>, surface: Surface) -> Self {
        Self { primitive, surface }
    }

    pub fn primitive(&self) -> &Primitive {
        &self.primitive
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn load(rsc: &mut SceneResources, params: &mut InputParams) -> anyhow::Result<()> {
        params.set_name("instance".into());
        let name = params.get_str("name")?;
        params.set_name(format!("instance-{}", name).into());

        let primitive = rsc.clone_primitive(params.get_str("primitive")?)?;
        let material = rsc.clone_material(params.get_str("material")?)?;
        let emissive = params.get_float3_or("emissive", [0.0, 0.0, 0.0])?;
        let double_sided = params.get_bool_or("double_sided", false)?;
        let light_samples = params.get_int_or("light_samples", 1)?;
        if light_samples <= 0 {
            anyhow::bail!(format!(
                "{} - 'light_samples' should be positive",
                params.name()
            ));
        }

        let surface = Surface::new(
            material,
            emissive.into(),
            double_sided,
            light_samples as u32,
        );
        rsc.add_instance(name, Self::new(primitive, surface))?;

        params.check_unused_keys();

        Ok(())
    }

    pub fn intersect_test(&self, ray: &Ray, t_max: f32) -> bool {
        self.primitive.intersect_test(ray, t_max)
    }

    pub fn intersect<'a>(&'a self, ray: &Ray, inter: &mut Intersection<'a>) -> bool {
        if self.primitive.intersect(ray, inter) {
            inter.instance = Some(self);
            true
        } else {
            false
        }
    }
}
