mod direct;
mod util;

pub use direct::*;

use crate::{
    core::{film::BoxFilter, loader::InputParams, scene::Scene},
    sampler::Sampler,
};

pub struct OutputConfig {
    pub width: u32,
    pub height: u32,
    pub output_filename: String,
    pub used_camera_name: String,
}

#[enum_dispatch::enum_dispatch(Renderer)]
pub trait RendererT {
    fn render(&self, scene: &Scene, config: &OutputConfig) -> anyhow::Result<()>;
}

#[enum_dispatch::enum_dispatch]
pub enum Renderer {
    DirectLightingRenderer,
}

pub fn create_renderer_from_params(
    params: &mut InputParams,
    sampler: Sampler,
    filter: BoxFilter,
) -> anyhow::Result<Renderer> {
    params.set_name("renderer".into());
    let ty = params.get_str("type")?;
    params.set_name(format!("renderer-{}", ty).into());

    let res = match ty.as_str() {
        "adaptive" | "exhaustive" => {
            DirectLightingRenderer::load(params, &ty, sampler, filter)?.into()
        }
        _ => anyhow::bail!(format!("{}: unknown type '{}'", params.name(), ty)),
    };

    params.check_unused_keys();

    Ok(res)
}

/// Reads the reconstruction filter. Only `box` is supported, and its
/// `radius` is in pixels.
pub fn load_filter(params: &mut InputParams) -> anyhow::Result<BoxFilter> {
    params.set_name("filter".into());
    let ty = params.get_str("type")?;
    params.set_name(format!("filter-{}", ty).into());
    if ty != "box" {
        anyhow::bail!(format!("{}: unknown type '{}'", params.name(), ty));
    }

    let radius = params.get_float_or("radius", BoxFilter::DEFAULT_RADIUS)?;
    if !(radius > 0.0) {
        anyhow::bail!(format!("{} - 'radius' should be positive", params.name()));
    }

    params.check_unused_keys();

    Ok(BoxFilter::new(radius))
}
