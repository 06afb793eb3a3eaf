use anyhow::{Context, Result};
use clap::Parser;
use lumen_renderer::{BvhNode, RenderConfig, Renderer};
use rand::rngs::SmallRng;
use rand::SeedableRng;

mod cli;
mod scenes;
mod settings;

use cli::Args;
use scenes::SceneAssets;
use settings::RenderSettings;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(args.log_level.into())
        .init();

    log::info!("Starting lumen {}", env!("CARGO_PKG_VERSION"));

    let file_settings = match &args.settings {
        Some(path) => RenderSettings::load(path)?,
        None => RenderSettings::default(),
    };
    let settings = file_settings.merged(RenderSettings::from_args(&args));

    // The seed fixes scene layout as well as the samples
    let mut scene_rng = match settings.seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    };
    let assets = SceneAssets {
        model: args.model.clone(),
        texture: args.texture.clone(),
    };
    let scene = scenes::build(args.scene, &assets, &mut scene_rng)?;

    let (camera, config) = settings.apply(scene.camera, RenderConfig::default())?;
    let world = BvhNode::new(&scene.world);

    Renderer::new(config)
        .render_to_file(&camera, &world)
        .with_context(|| format!("failed to render {}", camera.output_filename))?;

    Ok(())
}
