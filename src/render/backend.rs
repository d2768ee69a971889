//! Seam to the GPU resource manager.
//!
//! Buffer allocation and program compilation belong to the host engine. The
//! grass system only needs to know which shading dialect the active backend
//! speaks, whether it can run vertex programs at all, and a way to hand it
//! generated source.

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};
use crate::shader::ShaderLanguage;

/// Family of the active rendering backend.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Direct3D,
    #[default]
    OpenGl,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub kind: BackendKind,
    pub vertex_programs: bool,
}

impl Capabilities {
    /// Dialect generated vertex programs are written in.
    pub fn shader_language(&self) -> ShaderLanguage {
        match self.kind {
            BackendKind::Direct3D => ShaderLanguage::Hlsl,
            BackendKind::OpenGl => ShaderLanguage::Glsl,
            BackendKind::Other => ShaderLanguage::Cg,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            vertex_programs: true,
        }
    }
}

/// Handle to a compiled vertex program owned by the backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgramHandle(pub u64);

/// Everything the backend needs to compile one generated program.
#[derive(Clone, Debug)]
pub struct ProgramDesc<'a> {
    pub name: &'a str,
    pub language: ShaderLanguage,
    pub source: &'a str,
    /// Compiler settings such as target profile and entry point.
    pub settings: &'a [(&'static str, &'static str)],
}

pub trait RenderBackend {
    fn capabilities(&self) -> Capabilities;

    /// Compile and load a vertex program. Synchronous.
    fn compile_vertex_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramHandle>;
}

/// A program accepted by [`HeadlessBackend`].
#[derive(Clone, Debug)]
pub struct CompiledProgram {
    pub handle: ProgramHandle,
    pub name: String,
    pub language: ShaderLanguage,
    pub source: String,
}

/// In-process backend that records programs instead of compiling them.
///
/// Used by tools and tests that run without a GPU.
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    caps: Capabilities,
    programs: Vec<CompiledProgram>,
}

impl HeadlessBackend {
    pub fn new(caps: Capabilities) -> Self {
        Self {
            caps,
            programs: Vec::new(),
        }
    }

    /// Programs compiled so far, in compile order.
    pub fn programs(&self) -> &[CompiledProgram] {
        &self.programs
    }

    pub fn program(&self, handle: ProgramHandle) -> Option<&CompiledProgram> {
        self.programs.iter().find(|p| p.handle == handle)
    }
}

impl RenderBackend for HeadlessBackend {
    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn compile_vertex_program(&mut self, desc: &ProgramDesc<'_>) -> Result<ProgramHandle> {
        if !self.caps.vertex_programs {
            return Err(Error::ShaderCompile {
                name: desc.name.to_string(),
                reason: "backend has no vertex program support".into(),
            });
        }
        if !desc.source.contains("main") {
            return Err(Error::ShaderCompile {
                name: desc.name.to_string(),
                reason: "missing entry point".into(),
            });
        }

        let handle = ProgramHandle(self.programs.len() as u64);
        self.programs.push(CompiledProgram {
            handle,
            name: desc.name.to_string(),
            language: desc.language,
            source: desc.source.to_string(),
        });
        log::debug!("Compiled vertex program {} ({} bytes)", desc.name, desc.source.len());
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_per_backend() {
        let mut caps = Capabilities::default();
        assert_eq!(caps.shader_language(), ShaderLanguage::Glsl);
        caps.kind = BackendKind::Direct3D;
        assert_eq!(caps.shader_language(), ShaderLanguage::Hlsl);
        caps.kind = BackendKind::Other;
        assert_eq!(caps.shader_language(), ShaderLanguage::Cg);
    }

    #[test]
    fn test_headless_records_programs() {
        let mut backend = HeadlessBackend::default();
        let desc = ProgramDesc {
            name: "vp",
            language: ShaderLanguage::Glsl,
            source: "void main() {}",
            settings: &[],
        };
        let a = backend.compile_vertex_program(&desc).unwrap();
        let b = backend.compile_vertex_program(&desc).unwrap();
        assert_ne!(a, b);
        assert_eq!(backend.programs().len(), 2);
        assert_eq!(backend.program(b).unwrap().name, "vp");
    }

    #[test]
    fn test_headless_rejects_without_support() {
        let mut backend = HeadlessBackend::new(Capabilities {
            kind: BackendKind::OpenGl,
            vertex_programs: false,
        });
        let desc = ProgramDesc {
            name: "vp",
            language: ShaderLanguage::Glsl,
            source: "void main() {}",
            settings: &[],
        };
        assert!(backend.compile_vertex_program(&desc).is_err());
    }
}
