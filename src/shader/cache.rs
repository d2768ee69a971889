//! Cache of generated vertex programs and the materials derived for them.

use std::collections::HashMap;

use super::assembler::assemble;
use super::fragments::table_for;
use super::material::{MaterialLibrary, VertexProgramRef, bindings_for};
use super::options::{ShaderLanguage, ShaderOptions};
use crate::core::Result;
use crate::grass::layer::LayerParams;
use crate::render::backend::{Capabilities, ProgramDesc, ProgramHandle, RenderBackend};

/// A compiled program shared by every layer with the same options.
#[derive(Clone, Debug, PartialEq)]
pub struct ShaderVariant {
    pub key: String,
    pub handle: ProgramHandle,
    pub options: ShaderOptions,
}

/// Generated programs keyed by option tuple.
#[derive(Debug)]
pub struct ShaderVariantCache {
    language: ShaderLanguage,
    enabled: bool,
    variants: HashMap<String, ShaderVariant>,
}

impl ShaderVariantCache {
    /// Generation is off when the backend cannot run vertex programs or
    /// shaders are disabled.
    pub fn new(caps: Capabilities, shaders_enabled: bool) -> Self {
        Self {
            language: caps.shader_language(),
            enabled: caps.vertex_programs && shaders_enabled,
            variants: HashMap::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn language(&self) -> ShaderLanguage {
        self.language
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn variant(&self, key: &str) -> Option<&ShaderVariant> {
        self.variants.get(key)
    }

    /// Compiled variant for `options`, generating it on a miss.
    pub fn variant_for(&mut self, options: &ShaderOptions, backend: &mut dyn RenderBackend) -> Result<&ShaderVariant> {
        let key = options.cache_key();
        if !self.variants.contains_key(&key) {
            let program = assemble(options);
            let handle = backend.compile_vertex_program(&ProgramDesc {
                name: &program.name,
                language: program.language,
                source: &program.source,
                settings: program.settings,
            })?;
            log::info!("Generated grass vertex program {key} ({})", program.language);
            self.variants.insert(
                key.clone(),
                ShaderVariant {
                    key: key.clone(),
                    handle,
                    options: options.clone(),
                },
            );
        }
        Ok(&self.variants[&key])
    }

    /// Name of the material a layer should draw with.
    ///
    /// Clones the layer's base material once per variant, switches off its
    /// fixed-function lighting and binds the generated program. Returns the
    /// base name unchanged when generation is off.
    pub fn material_for(
        &mut self,
        params: &LayerParams,
        far_view_distance: f32,
        backend: &mut dyn RenderBackend,
        library: &mut MaterialLibrary,
    ) -> Result<String> {
        // Fail fast on a missing base before compiling anything
        library.get(&params.material)?;

        if !self.enabled {
            log::info!(
                "Vertex programs unavailable; {} keeps its base material",
                params.material
            );
            return Ok(params.material.clone());
        }

        let options = ShaderOptions::for_layer(params, far_view_distance, self.language);
        let name = options.material_name(&params.material);
        if library.contains(&name) {
            return Ok(name);
        }

        let variant = self.variant_for(&options, backend)?;
        let program = VertexProgramRef {
            name: variant.key.clone(),
            handle: variant.handle,
        };
        let implicit = table_for(self.language).implicit_world_view_proj();

        let material = library.clone_as(&params.material, &name)?;
        material.lighting_enabled = false;
        material.vertex_program = Some(program);
        material.params = bindings_for(&options, implicit);
        log::debug!("Derived material {name}");
        Ok(name)
    }
}
