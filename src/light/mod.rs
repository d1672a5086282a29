mod directional;
mod environment;
mod point;
mod shape_light;
mod spot;

pub use directional::*;
pub use environment::*;
pub use point::*;
pub use shape_light::*;
pub use spot::*;

use crate::{
    core::{color::Color, loader::InputParams, ray::Ray, scene_resources::SceneResources},
    direct::{IncidentSample, LightSampler, ShadingPoint, VisibilityQuery},
};

#[enum_dispatch::enum_dispatch(Light)]
pub trait LightT: Send + Sync {
    /// Unshadowed radiance arriving at `point` from the position `u` maps to.
    fn sample_incident(&self, point: &ShadingPoint, u: (f32, f32)) -> IncidentSample;

    /// Radiance seen by a ray that leaves the scene.
    fn le(&self, _ray: &Ray) -> Color {
        Color::BLACK
    }

    fn n_samples(&self) -> u32;

    fn is_delta(&self) -> bool;
}

#[enum_dispatch::enum_dispatch]
pub enum Light {
    DirLight,
    EnvLight,
    PointLight,
    ShapeLight,
    SpotLight,
}

impl LightSampler for Light {
    fn sample_incident(&self, point: &ShadingPoint, u: (f32, f32)) -> IncidentSample {
        LightT::sample_incident(self, point, u)
    }

    fn sample_count(&self) -> u32 {
        self.n_samples()
    }
}

pub fn create_light_from_params(
    rsc: &mut SceneResources,
    params: &mut InputParams,
) -> anyhow::Result<()> {
    params.set_name("light".into());
    let ty = params.get_str("type")?;
    let name = params.get_str("name")?;
    params.set_name(format!("light-{}-{}", ty, name).into());

    let res = match ty.as_str() {
        "directional" => DirLight::load(params)?.into(),
        "environment" => EnvLight::load(params)?.into(),
        "point" => PointLight::load(params)?.into(),
        "spot" => SpotLight::load(params)?.into(),
        _ => anyhow::bail!(format!("{}: unknown type '{}'", params.name(), ty)),
    };

    rsc.add_light(name, res)?;

    params.check_unused_keys();

    Ok(())
}

fn load_samples(params: &mut InputParams) -> anyhow::Result<u32> {
    let samples = params.get_int_or("samples", 1)?;
    if samples <= 0 {
        anyhow::bail!(format!("{} - 'samples' should be positive", params.name()));
    }
    Ok(samples as u32)
}

/// Incident sample towards a point light source at `target`.
fn sample_towards(point: &ShadingPoint, target: glam::Vec3A, intensity: Color) -> IncidentSample {
    let vec = target - point.position;
    let dist_sqr = vec.length_squared();
    if dist_sqr == 0.0 {
        return IncidentSample::none(point.position);
    }
    let dist = dist_sqr.sqrt();
    let wi = vec / dist;
    IncidentSample {
        wi,
        pdf: 1.0,
        radiance: intensity / dist_sqr,
        visibility: VisibilityQuery::new(point.position, wi, dist),
    }
}
