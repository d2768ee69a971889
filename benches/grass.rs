use criterion::{criterion_group, criterion_main, Criterion, black_box};

use sward::core::IdGenerator;
use sward::grass::{
    placement, DeterministicSampler, GeometryBuilder, GrassConfig, GrassLoader, GrassPage, Ground, Instance, LayerSettings,
    RenderTechnique,
};
use sward::math::Rect;
use sward::render::HeadlessBackend;
use sward::scene::EntityGraph;
use sward::shader::{Material, MaterialLibrary};
use sward::terrain::{HeightParams, NoiseHeightField};

fn loader(technique: RenderTechnique) -> GrassLoader<HeadlessBackend> {
    let mut layer = LayerSettings::new("grass");
    layer.render_technique = technique;
    let config = GrassConfig {
        layers: vec![layer],
        ..Default::default()
    };
    let materials: MaterialLibrary = [Material::new("grass")].into_iter().collect();
    let mut loader = GrassLoader::from_config(&config, HeadlessBackend::default(), materials)
        .expect("bench config is valid");
    loader.set_height_function(NoiseHeightField::new(HeightParams::default()).into_height_fn());
    loader
}

fn bench_placement(c: &mut Criterion) {
    let loader = loader(RenderTechnique::FlatQuad);
    let bounds = Rect::new(0.0, 0.0, 100.0, 100.0);
    let layer = loader.layer(0).expect("one layer");

    c.bench_function("placement_uniform_10k", |b| {
        b.iter(|| {
            let budget = placement::instance_budget(layer.params(), &bounds, 1.0);
            let mut sampler = DeterministicSampler::new(1);
            placement::sample(black_box(&bounds), layer.params(), budget, Ground::flat(), &mut sampler)
        });
    });
}

fn bench_geometry(c: &mut Criterion) {
    let terrain = NoiseHeightField::new(HeightParams::default());
    let height = |x: f32, z: f32| terrain.height_at(x, z);
    let page = GrassPage::new(Rect::new(0.0, 0.0, 100.0, 100.0));
    let ids = IdGenerator::new();

    let instances: Vec<Instance> = (0..10_000)
        .map(|i| Instance {
            x: (i % 100) as f32 + 0.5,
            z: (i / 100) as f32 + 0.5,
            size: (i % 7) as f32 / 7.0,
            angle: i as f32 * 0.37,
        })
        .collect();

    for technique in [RenderTechnique::FlatQuad, RenderTechnique::CrossedQuads, RenderTechnique::Sprite] {
        let mut loader = loader(technique);
        let layer = loader.layer_mut(0).expect("one layer");
        let mut builder = GeometryBuilder::new();

        c.bench_function(&format!("geometry_{technique}_10k"), |b| {
            b.iter(|| {
                builder.build(&page, layer, black_box(&instances), Ground::from_fn(&height), &ids)
            });
        });
    }
}

fn bench_load_page(c: &mut Criterion) {
    let mut loader = loader(RenderTechnique::FlatQuad);
    let mut host = EntityGraph::new();

    c.bench_function("load_page_64", |b| {
        b.iter(|| {
            let mut page = GrassPage::new(Rect::new(0.0, 0.0, 64.0, 64.0));
            let report = loader.load_page(&mut page, &mut host);
            loader.unload_page(&mut page, &mut host);
            report
        });
    });
}

criterion_group!(benches, bench_placement, bench_geometry, bench_load_page);
criterion_main!(benches);
