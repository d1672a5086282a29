mod perspective;

pub use perspective::*;

use crate::core::{loader::InputParams, ray::Ray, scene_resources::SceneResources};

#[enum_dispatch::enum_dispatch(Camera)]
pub trait CameraT: Send + Sync {
    /// `point` is on the image plane, `y` in `[-0.5, 0.5]` and `x` scaled by
    /// the aspect ratio.
    fn generate_ray(&self, point: (f32, f32)) -> Ray;
}

#[enum_dispatch::enum_dispatch]
pub enum Camera {
    PerspectiveCamera,
}

pub fn create_camera_from_params(
    rsc: &mut SceneResources,
    params: &mut InputParams,
) -> anyhow::Result<()> {
    params.set_name("camera".into());
    let ty = params.get_str("type")?;
    let name = params.get_str("name")?;
    params.set_name(format!("camera-{}-{}", ty, name).into());

    let res = match ty.as_str() {
        "perspective" => PerspectiveCamera::load(params)?.into(),
        _ => anyhow::bail!(format!("{}: unknown type '{}'", params.name(), ty)),
    };

    rsc.add_camera(name, res)?;

    params.check_unused_keys();

    Ok(())
}
