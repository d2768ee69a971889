//! Build grass for a single page and report what was generated.
//!
//! Usage: cargo run --release --bin build_page -- [--config grass.json] [--size 64] [--origin 0,0] [--frames 60]
//!
//! Without a config, three layers (one per render technique) are built over
//! noise terrain.

use std::path::PathBuf;
use std::time::Instant;

use sward::core::Result;
use sward::grass::{FadeTechnique, GrassConfig, GrassLoader, GrassPage, LayerBuildState, LayerSettings, RenderTechnique};
use sward::math::Rect;
use sward::render::HeadlessBackend;
use sward::scene::EntityGraph;
use sward::shader::{Material, MaterialLibrary};
use sward::terrain::HeightParams;

fn arg<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn demo_config() -> GrassConfig {
    let mut grass = LayerSettings::new("grass");
    grass.density = 2.0;
    grass.min_size = [0.8, 0.6];
    grass.max_size = [1.2, 1.0];
    grass.max_slope = 0.8;
    grass.animation.enabled = true;

    let mut reeds = LayerSettings::new("reeds");
    reeds.density = 0.3;
    reeds.render_technique = RenderTechnique::CrossedQuads;
    reeds.max_y = 6.0;
    reeds.fade_technique = FadeTechnique::AlphaGrow;

    let mut flowers = LayerSettings::new("flowers");
    flowers.density = 0.1;
    flowers.render_technique = RenderTechnique::Sprite;
    flowers.lighting = true;

    GrassConfig {
        terrain: Some(HeightParams::default()),
        layers: vec![grass, reeds, flowers],
        ..Default::default()
    }
}

fn main() -> Result<()> {
    sward::core::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let config = match arg(&args, "--config") {
        Some(path) => GrassConfig::from_json_file(&PathBuf::from(path))?,
        None => demo_config(),
    };
    let size: f32 = arg(&args, "--size").and_then(|s| s.parse().ok()).unwrap_or(64.0);
    let (ox, oz) = arg(&args, "--origin")
        .and_then(|s| s.split_once(','))
        .and_then(|(x, z)| Some((x.trim().parse::<f32>().ok()?, z.trim().parse::<f32>().ok()?)))
        .unwrap_or((0.0, 0.0));
    let frames: u32 = arg(&args, "--frames").and_then(|s| s.parse().ok()).unwrap_or(0);

    // The host would own real materials; register a plain one per layer
    let materials: MaterialLibrary = config
        .layers
        .iter()
        .map(|l| Material::new(l.material.clone()))
        .collect();

    let mut loader = GrassLoader::from_config(&config, HeadlessBackend::default(), materials)?;
    let mut host = EntityGraph::new();
    let mut page = GrassPage::new(Rect::new(ox, oz, ox + size, oz + size));

    let start = Instant::now();
    let report = loader.load_page(&mut page, &mut host);
    let elapsed = start.elapsed();

    for (index, state) in report.states.iter().enumerate() {
        let name = loader.layer(index).map_or("?", |l| l.params().material.as_str());
        match state {
            LayerBuildState::Attached { entity, quads } => {
                let Some(entity) = host.get(*entity) else { continue };
                log::info!(
                    "{name}: {quads} quads, {} vertices, material {}, y {:.2}..{:.2}",
                    entity.mesh.vertex_count(),
                    entity.mesh.material,
                    entity.mesh.bounds.min.y,
                    entity.mesh.bounds.max.y,
                );
            }
            other => log::info!("{name}: {other:?}"),
        }
    }
    log::info!(
        "Page {:?}: {} meshes, {} quads in {:.2?}",
        page.bounds(),
        report.attached(),
        report.quads(),
        elapsed
    );

    for program in loader.backend().programs() {
        log::info!("Program {} ({}, {} bytes)", program.name, program.language, program.source.len());
        log::debug!("{}", program.source);
    }

    for _ in 0..frames {
        loader.frame_update(1.0 / 60.0);
    }
    if frames > 0 {
        for layer in loader.layers() {
            log::info!("{} sway phase {:.3}", layer.params().material, layer.wave_phase());
        }
    }

    loader.unload_page(&mut page, &mut host);
    Ok(())
}
