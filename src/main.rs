use std::path::PathBuf;

use structopt::StructOpt;

use adaptive_direct::{
    loader,
    renderer::{OutputConfig, RendererT},
};

#[derive(StructOpt)]
#[structopt(
    name = "adaptive-direct",
    about = "Direct lighting renderer with a visibility budget"
)]
struct Opt {
    /// Renderer description (json)
    #[structopt(parse(from_os_str))]
    renderer: PathBuf,

    /// Scene description (json)
    #[structopt(parse(from_os_str))]
    scene: PathBuf,

    #[structopt(short, long, default_value = "output.png")]
    output: String,

    #[structopt(short = "W", long, default_value = "512")]
    width: u32,

    #[structopt(short = "H", long, default_value = "512")]
    height: u32,

    /// Name of the camera to render from
    #[structopt(short, long, default_value = "main")]
    camera: String,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opt = Opt::from_args();
    if opt.width == 0 || opt.height == 0 {
        anyhow::bail!("image size should be positive, got {}x{}", opt.width, opt.height);
    }

    log::info!("Loading renderer '{}'...", opt.renderer.display());
    let renderer = loader::load_renderer(&opt.renderer)?;

    log::info!("Loading scene '{}'...", opt.scene.display());
    let scene = loader::load_scene(&opt.scene)?;

    let config = OutputConfig {
        width: opt.width,
        height: opt.height,
        output_filename: opt.output,
        used_camera_name: opt.camera,
    };

    log::info!("Rendering {}x{}...", config.width, config.height);
    let begin_time = std::time::SystemTime::now();
    renderer.render(&scene, &config)?;
    let duration = std::time::SystemTime::now().duration_since(begin_time)?;
    log::info!("Finished, time used: {:?}", duration);

    Ok(())
}
