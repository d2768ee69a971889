//! Materials and the shader parameters bound on them.

use std::collections::HashMap;

use glam::Vec4;

use super::options::ShaderOptions;
use crate::core::{Error, Result};
use crate::render::backend::ProgramHandle;

/// Engine-supplied constants refreshed by the host each draw.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AutoConstant {
    WorldViewProjMatrix,
    CameraPositionObjectSpace,
    LightPositionObjectSpace,
    LightDiffuseColour,
    AmbientLightColour,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamValue {
    Float(f32),
    Vec4(Vec4),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamSource {
    Auto(AutoConstant),
    Custom(ParamValue),
}

/// A named vertex program parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamBinding {
    pub name: &'static str,
    pub source: ParamSource,
}

/// Parameters a variant needs, in declaration order.
pub fn bindings_for(options: &ShaderOptions, implicit_world_view_proj: bool) -> Vec<ParamBinding> {
    use AutoConstant::*;
    use ParamSource::{Auto, Custom};

    let mut params = Vec::new();
    let mut bind = |name: &'static str, source: ParamSource| params.push(ParamBinding { name, source });

    if !implicit_world_view_proj {
        bind("worldViewProj", Auto(WorldViewProjMatrix));
    }
    bind("camPos", Auto(CameraPositionObjectSpace));
    bind("fadeRange", Custom(ParamValue::Float(options.fade_range())));
    if options.animate {
        bind("time", Custom(ParamValue::Float(0.0)));
        bind("frequency", Custom(ParamValue::Float(0.0)));
        bind("direction", Custom(ParamValue::Vec4(Vec4::ZERO)));
    }
    if let Some(height) = options.grow_height() {
        bind("grassHeight", Custom(ParamValue::Float(height)));
    }
    if options.lighting {
        bind("objSpaceLight", Auto(LightPositionObjectSpace));
        bind("lightDiffuse", Auto(LightDiffuseColour));
        bind("lightAmbient", Auto(AmbientLightColour));
    }
    params
}

/// Vertex program attached to a material.
#[derive(Clone, Debug, PartialEq)]
pub struct VertexProgramRef {
    pub name: String,
    pub handle: ProgramHandle,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    pub name: String,
    pub lighting_enabled: bool,
    pub vertex_program: Option<VertexProgramRef>,
    pub params: Vec<ParamBinding>,
}

impl Material {
    /// A plain material with fixed-function lighting and no program.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lighting_enabled: true,
            vertex_program: None,
            params: Vec::new(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&ParamSource> {
        self.params.iter().find(|p| p.name == name).map(|p| &p.source)
    }

    /// Update a custom constant. Returns false if the material has no such
    /// custom parameter.
    pub fn set_param(&mut self, name: &str, value: ParamValue) -> bool {
        match self.params.iter_mut().find(|p| p.name == name) {
            Some(ParamBinding { source: source @ ParamSource::Custom(_), .. }) => {
                *source = ParamSource::Custom(value);
                true
            }
            _ => false,
        }
    }
}

/// Named materials known to the host.
#[derive(Clone, Debug, Default)]
pub struct MaterialLibrary {
    materials: HashMap<String, Material>,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a material.
    pub fn insert(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&Material> {
        self.materials
            .get(name)
            .ok_or_else(|| Error::MaterialNotFound(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut Material> {
        self.materials
            .get_mut(name)
            .ok_or_else(|| Error::MaterialNotFound(name.to_string()))
    }

    /// Copy `base` under `name`, leaving any existing `name` untouched.
    pub fn clone_as(&mut self, base: &str, name: &str) -> Result<&mut Material> {
        if !self.materials.contains_key(name) {
            let mut copy = self.get(base)?.clone();
            copy.name = name.to_string();
            self.materials.insert(name.to_string(), copy);
        }
        self.get_mut(name)
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

impl FromIterator<Material> for MaterialLibrary {
    fn from_iter<I: IntoIterator<Item = Material>>(iter: I) -> Self {
        let mut library = Self::new();
        for material in iter {
            library.insert(material);
        }
        library
    }
}
