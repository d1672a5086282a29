use std::{
    convert::TryInto,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    camera,
    core::{loader::InputParams, scene::Scene, scene_resources::SceneResources},
    light, material,
    primitive::{self, Instance},
    renderer::{self, Renderer},
    sampler,
};

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let json_file = std::fs::File::open(path)
        .with_context(|| format!("can't open json file '{}'", path.display()))?;
    let json_reader = std::io::BufReader::new(json_file);
    let json_value = serde_json::from_reader(json_reader)
        .with_context(|| format!("can't parse json file '{}'", path.display()))?;
    Ok(json_value)
}

pub fn load_renderer<P: AsRef<Path>>(path: P) -> anyhow::Result<Renderer> {
    let json_value = read_json(path.as_ref())?;

    let sampler_value = json_value
        .get("sampler")
        .context("renderer - There is no 'sampler' field")?;
    let mut sampler_params: InputParams = sampler_value.try_into()?;
    let sampler = sampler::create_sampler_from_params(&mut sampler_params)?;

    let filter_value = json_value
        .get("filter")
        .context("renderer - There is no 'filter' field")?;
    let mut filter_params: InputParams = filter_value.try_into()?;
    let filter = renderer::load_filter(&mut filter_params)?;

    let mut params: InputParams = (&json_value).try_into()?;
    renderer::create_renderer_from_params(&mut params, sampler, filter)
}

pub fn load_scene<P: AsRef<Path>>(path: P) -> anyhow::Result<Scene> {
    let path = path.as_ref().to_path_buf();
    let mut rsc = SceneResources::default();

    let json_value = read_json(&path)?;

    let camera_value = json_value
        .get("cameras")
        .context("scene - There is no 'cameras' field")?;
    load_from_value_or_external(
        &mut rsc,
        &path,
        camera_value,
        "json-cameras",
        &camera::create_camera_from_params,
    )?;

    let material_value = json_value
        .get("materials")
        .context("scene - There is no 'materials' field")?;
    load_from_value_or_external(
        &mut rsc,
        &path,
        material_value,
        "json-materials",
        &material::create_material_from_params,
    )?;

    let primitive_value = json_value
        .get("primitives")
        .context("scene - There is no 'primitives' field")?;
    load_from_value_or_external(
        &mut rsc,
        &path,
        primitive_value,
        "json-primitives",
        &primitive::create_primitive_from_params,
    )?;

    let instance_value = json_value
        .get("instances")
        .context("scene - There is no 'instances' field")?;
    load_from_value_or_external(
        &mut rsc,
        &path,
        instance_value,
        "json-instances",
        &Instance::load,
    )?;

    // emissive instances are lights too, so a scene may have no explicit light
    if let Some(light_value) = json_value.get("lights") {
        load_from_value_or_external(
            &mut rsc,
            &path,
            light_value,
            "json-lights",
            &light::create_light_from_params,
        )?;
    }

    rsc.to_scene()
}

fn load_from_object<F: Fn(&mut SceneResources, &mut InputParams) -> anyhow::Result<()>>(
    rsc: &mut SceneResources,
    value: &serde_json::Value,
    load_func: &F,
) -> anyhow::Result<()> {
    let mut params: InputParams = value.try_into()?;
    load_func(rsc, &mut params)
}

/// `value` is an object, an array of objects or the path of a json file
/// holding either, relative to the file that refers to it.
fn load_from_value_or_external<
    F: Fn(&mut SceneResources, &mut InputParams) -> anyhow::Result<()>,
>(
    rsc: &mut SceneResources,
    path: &PathBuf,
    value: &serde_json::Value,
    env: &str,
    load_func: &F,
) -> anyhow::Result<()> {
    if let Some(json_path) = value.as_str() {
        let external_path = path.with_file_name(json_path);
        let json_value = read_json(&external_path)
            .with_context(|| format!("{} - External json file not loaded", env))?;
        load_from_value_or_external(rsc, &external_path, &json_value, env, load_func)?;
    } else if let Some(array) = value.as_array() {
        for ele in array {
            load_from_object(rsc, ele, load_func)?;
        }
    } else {
        load_from_object(rsc, value, load_func)?;
    }

    Ok(())
}
