pub mod util;

mod glass;
mod lambert;
mod mirror;
mod pseudo;

pub use glass::*;
pub use lambert::*;
pub use mirror::*;
pub use pseudo::*;

use crate::{
    core::{color::Color, loader::InputParams, scene_resources::SceneResources},
    direct::MaterialEvaluator,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpecularLobe {
    Reflection,
    Transmission,
}

/// A specular direction and its throughput `f * |cos| / pdf`.
pub struct SpecularSample {
    pub wi: glam::Vec3A,
    pub weight: Color,
}

/// All directions are in world space and point away from the surface.
/// `normal` is the geometric normal as stored by the primitive, so a material
/// can tell entering from leaving.
#[enum_dispatch::enum_dispatch(Material)]
pub trait MaterialT: Send + Sync {
    /// Non-specular response, black for purely specular materials.
    fn evaluate(&self, _wo: glam::Vec3A, _wi: glam::Vec3A, _normal: glam::Vec3A) -> Color {
        Color::BLACK
    }

    fn sample_specular(
        &self,
        _wo: glam::Vec3A,
        _normal: glam::Vec3A,
        _lobe: SpecularLobe,
    ) -> Option<SpecularSample> {
        None
    }

    /// `false` for boundaries that do not scatter, rays pass straight through.
    fn has_bsdf(&self) -> bool {
        true
    }
}

#[enum_dispatch::enum_dispatch]
pub enum Material {
    Glass,
    Lambert,
    Mirror,
    PseudoMaterial,
}

impl MaterialEvaluator for Material {
    fn evaluate(&self, wo: glam::Vec3A, wi: glam::Vec3A, normal: glam::Vec3A) -> Color {
        MaterialT::evaluate(self, wo, wi, normal)
    }
}

pub fn create_material_from_params(
    rsc: &mut SceneResources,
    params: &mut InputParams,
) -> anyhow::Result<()> {
    params.set_name("material".into());
    let ty = params.get_str("type")?;
    let name = params.get_str("name")?;
    params.set_name(format!("material-{}-{}", ty, name).into());

    let res = match ty.as_str() {
        "glass" => Glass::load(params)?.into(),
        "lambert" => Lambert::load(params)?.into(),
        "mirror" => Mirror::load(params)?.into(),
        "pseudo" => PseudoMaterial::new().into(),
        _ => anyhow::bail!(format!("{}: unknown type '{}'", params.name(), ty)),
    };

    rsc.add_material(name, res)?;

    params.check_unused_keys();

    Ok(())
}
