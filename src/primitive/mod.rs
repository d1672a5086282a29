mod group;
mod instance;
mod quad;
mod sphere;

pub use group::*;
pub use instance::*;
pub use quad::*;
pub use sphere::*;

use crate::core::{
    intersection::Intersection, loader::InputParams, ray::Ray, scene_resources::SceneResources,
};

#[enum_dispatch::enum_dispatch(Primitive)]
pub trait PrimitiveT: Send + Sync {
    fn intersect_test(&self, ray: &Ray, t_max: f32) -> bool;

    /// Updates `inter` only when the hit is closer than `inter.t`.
    fn intersect<'a>(&'a self, ray: &Ray, inter: &mut Intersection<'a>) -> bool;

    /// Maps `u` to a point uniformly distributed over the surface, returns
    /// (position, outward normal).
    fn sample(&self, u: (f32, f32)) -> (glam::Vec3A, glam::Vec3A);

    fn surface_area(&self) -> f32;
}

#[enum_dispatch::enum_dispatch]
pub enum Primitive {
    Quad,
    Sphere,
}

pub fn create_primitive_from_params(
    rsc: &mut SceneResources,
    params: &mut InputParams,
) -> anyhow::Result<()> {
    params.set_name("primitive".into());
    let ty = params.get_str("type")?;
    let name = params.get_str("name")?;
    params.set_name(format!("primitive-{}-{}", ty, name).into());

    let res = match ty.as_str() {
        "quad" => Quad::load(params)?.into(),
        "sphere" => Sphere::load(params)?.into(),
        _ => anyhow::bail!(format!("{}: unknown type '{}'", params.name(), ty)),
    };

    rsc.add_primitive(name, res)?;

    params.check_unused_keys();

    Ok(())
}
