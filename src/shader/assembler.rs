//! Assembles vertex program source from fragments.

use super::fragments::{Fragment, FragmentTable, table_for};
use super::options::{ShaderLanguage, ShaderOptions};
use crate::grass::layer::RenderTechnique;

/// A generated vertex program ready to hand to the backend.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedProgram {
    pub name: String,
    pub language: ShaderLanguage,
    pub source: String,
    pub settings: &'static [(&'static str, &'static str)],
}

/// Ordered fragment list for a variant. Only the world-view-projection
/// uniform depends on the dialect.
pub fn plan(options: &ShaderOptions, implicit_world_view_proj: bool) -> Vec<Fragment> {
    let sprite = options.technique == RenderTechnique::Sprite;
    let grow = options.max_height.is_some();

    let mut fragments = vec![Fragment::Preamble];
    if sprite {
        fragments.push(Fragment::SpriteInput);
    }
    fragments.push(Fragment::Outputs);
    if !implicit_world_view_proj {
        fragments.push(Fragment::WorldViewProj);
    }
    fragments.push(Fragment::CommonUniforms);
    if options.animate {
        fragments.push(Fragment::AnimUniforms);
    }
    if grow {
        fragments.push(Fragment::GrowUniform);
    }
    if options.lighting {
        fragments.push(Fragment::LightUniforms);
    }

    fragments.push(Fragment::BodyOpen);
    fragments.push(if options.lighting { Fragment::LitColor } else { Fragment::UnlitColor });
    fragments.push(if options.fade.fades_alpha() { Fragment::AlphaFade } else { Fragment::OpaqueAlpha });
    if sprite {
        fragments.push(Fragment::Billboard);
    }
    if options.animate {
        fragments.push(Fragment::Sway);
    }
    match (options.blend, options.animate) {
        (true, true) => fragments.push(Fragment::BlendElse),
        (true, false) => fragments.push(Fragment::Blend),
        _ => {}
    }
    if grow {
        fragments.push(Fragment::Grow);
    }
    fragments.push(Fragment::Epilogue);
    fragments
}

/// Generate the program for `options` in its language.
pub fn assemble(options: &ShaderOptions) -> GeneratedProgram {
    let table = table_for(options.language);
    assemble_with(options, table)
}

pub fn assemble_with(options: &ShaderOptions, table: &dyn FragmentTable) -> GeneratedProgram {
    let source: String = plan(options, table.implicit_world_view_proj())
        .into_iter()
        .map(|f| table.fragment(f))
        .collect();

    GeneratedProgram {
        name: options.cache_key(),
        language: table.language(),
        source,
        settings: table.compile_settings(),
    }
}
