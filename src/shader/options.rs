//! The option tuple a grass vertex program is specialised on.

use std::fmt;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::grass::layer::{FadeTechnique, LayerParams, RenderTechnique};

/// Shading dialect of generated programs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderLanguage {
    Hlsl,
    Glsl,
    Cg,
}

impl ShaderLanguage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hlsl => "hlsl",
            Self::Glsl => "glsl",
            Self::Cg => "cg",
        }
    }
}

impl fmt::Display for ShaderLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scale from far view distance to the distance alpha reaches zero.
///
/// Fading must finish before the page centre leaves the view range, and
/// paging measures from page centres.
const FADE_RANGE_DIVISOR: f32 = 1.224_744_9; // sqrt(1.5)

/// Headroom added to the layer's max height when growing from the ground.
const GROW_HEADROOM: f32 = 1.05;

/// Everything that changes generated vertex program text.
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderOptions {
    pub animate: bool,
    pub blend: bool,
    pub lighting: bool,
    pub technique: RenderTechnique,
    pub fade: FadeTechnique,
    /// Layer max height, only present when the fade technique grows.
    pub max_height: Option<f32>,
    pub far_view_distance: f32,
    pub language: ShaderLanguage,
}

impl ShaderOptions {
    pub fn for_layer(params: &LayerParams, far_view_distance: f32, language: ShaderLanguage) -> Self {
        Self {
            animate: params.animation.enabled,
            blend: params.blend,
            lighting: params.lighting,
            technique: params.render_technique,
            fade: params.fade_technique,
            max_height: params.fade_technique.grows().then_some(params.max_height()),
            far_view_distance,
            language,
        }
    }

    /// Cache key and program name, e.g. `GrassVS_anim_quad_alpha_100_vp`.
    ///
    /// The language is not part of the key: one cache serves one backend.
    pub fn cache_key(&self) -> String {
        let mut key = String::from("GrassVS_");
        if self.animate {
            key.push_str("anim_");
        }
        if self.blend {
            key.push_str("blend_");
        }
        if self.lighting {
            key.push_str("lighting_");
        }
        let _ = write!(key, "{}_{}_", self.technique, self.fade);
        if let Some(height) = self.max_height {
            let _ = write!(key, "{height}_");
        }
        let _ = write!(key, "{}_vp", self.far_view_distance);
        key
    }

    /// Name of the material derived from `base` for this variant.
    pub fn material_name(&self, base: &str) -> String {
        format!("{base}_{}", self.cache_key())
    }

    /// Camera distance at which alpha fade reaches zero.
    pub fn fade_range(&self) -> f32 {
        self.far_view_distance / FADE_RANGE_DIVISOR
    }

    /// Height grass sinks by at the end of a grow fade.
    pub fn grow_height(&self) -> Option<f32> {
        self.max_height.map(|h| h * GROW_HEADROOM)
    }
}
