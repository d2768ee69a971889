//! Per-language source fragments for grass vertex programs.
//!
//! The assembler decides which fragments a variant needs; a table only
//! supplies the text. Supporting another dialect means adding one table.

use super::options::ShaderLanguage;

/// A named piece of vertex program source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fragment {
    /// Entry point signature up to the per-vertex inputs.
    Preamble,
    /// Billboard offset input used by sprites.
    SpriteInput,
    Outputs,
    WorldViewProj,
    /// Camera position and fade range.
    CommonUniforms,
    AnimUniforms,
    GrowUniform,
    LightUniforms,
    BodyOpen,
    LitColor,
    UnlitColor,
    AlphaFade,
    OpaqueAlpha,
    Billboard,
    Sway,
    /// Base sink as the else branch of [`Fragment::Sway`].
    BlendElse,
    Blend,
    Grow,
    Epilogue,
}

/// Source text for one shading dialect.
pub trait FragmentTable: Sync {
    fn language(&self) -> ShaderLanguage;

    fn fragment(&self, fragment: Fragment) -> &'static str;

    /// Whether the dialect provides the world-view-projection matrix itself.
    fn implicit_world_view_proj(&self) -> bool;

    /// Settings handed to the compiler with the source.
    fn compile_settings(&self) -> &'static [(&'static str, &'static str)];
}

/// HLSL and Cg share syntax and differ only in compile settings.
pub struct HlslFamily {
    language: ShaderLanguage,
}

pub struct GlslTable;

static HLSL: HlslFamily = HlslFamily {
    language: ShaderLanguage::Hlsl,
};
static CG: HlslFamily = HlslFamily {
    language: ShaderLanguage::Cg,
};
static GLSL: GlslTable = GlslTable;

/// Fragment table for `language`.
pub fn table_for(language: ShaderLanguage) -> &'static dyn FragmentTable {
    match language {
        ShaderLanguage::Hlsl => &HLSL,
        ShaderLanguage::Cg => &CG,
        ShaderLanguage::Glsl => &GLSL,
    }
}

impl FragmentTable for HlslFamily {
    fn language(&self) -> ShaderLanguage {
        self.language
    }

    fn fragment(&self, fragment: Fragment) -> &'static str {
        match fragment {
            Fragment::Preamble => concat!(
                "void main(\n",
                "\tfloat4 iPosition : POSITION,\n",
                "\tfloat4 iColor : COLOR,\n",
                "\tfloat2 iUV : TEXCOORD0,\n",
            ),
            Fragment::SpriteInput => "\tfloat4 iOffset : NORMAL,\n",
            Fragment::Outputs => concat!(
                "\tout float4 oPosition : POSITION,\n",
                "\tout float4 oColor : COLOR,\n",
                "\tout float2 oUV : TEXCOORD0,\n",
                "\tout float oFog : FOG,\n",
            ),
            Fragment::WorldViewProj => "\tuniform float4x4 worldViewProj,\n",
            Fragment::CommonUniforms => "\tuniform float3 camPos,\n\tuniform float fadeRange",
            Fragment::AnimUniforms => concat!(
                ",\n\tuniform float time",
                ",\n\tuniform float frequency",
                ",\n\tuniform float4 direction",
            ),
            Fragment::GrowUniform => ",\n\tuniform float grassHeight",
            Fragment::LightUniforms => concat!(
                ",\n\tuniform float4 objSpaceLight",
                ",\n\tuniform float4 lightDiffuse",
                ",\n\tuniform float4 lightAmbient",
            ),
            Fragment::BodyOpen => concat!(
                ")\n{\n",
                "\tfloat4 position = iPosition;\n",
                "\tfloat dist = distance(camPos.xz, position.xz);\n",
            ),
            Fragment::LitColor => concat!(
                "\tfloat3 light = normalize(objSpaceLight.xyz - (iPosition.xyz * objSpaceLight.w));\n",
                "\tfloat diffuseFactor = max(dot(float3(0, 1, 0), light), 0);\n",
                "\toColor = (lightAmbient + diffuseFactor * lightDiffuse) * iColor;\n",
            ),
            Fragment::UnlitColor => "\toColor.rgb = iColor.rgb;\n",
            Fragment::AlphaFade => "\toColor.a = 2.0f - (2.0f * dist / fadeRange);\n",
            Fragment::OpaqueAlpha => "\toColor.a = 1.0f;\n",
            Fragment::Billboard => concat!(
                "\tfloat3 toCamera = position.xyz - camPos;\n",
                "\tfloat3 side = normalize(cross(float3(0, 1, 0), toCamera));\n",
                "\tposition += float4(side.x * iOffset.x, iOffset.y, side.z * iOffset.x, 0);\n",
            ),
            Fragment::Sway => concat!(
                "\tif (iUV.y == 0.0f) {\n",
                "\t\tposition += direction * sin(time + iPosition.x * frequency);\n",
                "\t}\n",
            ),
            Fragment::BlendElse => "\telse {\n\t\tposition.y -= 1.0f;\n\t}\n",
            Fragment::Blend => "\tif (iUV.y != 0.0f) {\n\t\tposition.y -= 1.0f;\n\t}\n",
            Fragment::Grow => {
                "\tposition.y -= grassHeight * saturate((2.0f * dist / fadeRange) - 1.0f);\n"
            }
            Fragment::Epilogue => concat!(
                "\toPosition = mul(worldViewProj, position);\n",
                "\toUV = iUV;\n",
                "\toFog = oPosition.z;\n",
                "}\n",
            ),
        }
    }

    fn implicit_world_view_proj(&self) -> bool {
        false
    }

    fn compile_settings(&self) -> &'static [(&'static str, &'static str)] {
        match self.language {
            ShaderLanguage::Cg => &[("profiles", "vs_1_1 arbvp1"), ("entry_point", "main")],
            _ => &[("target", "vs_1_1"), ("entry_point", "main")],
        }
    }
}

impl FragmentTable for GlslTable {
    fn language(&self) -> ShaderLanguage {
        ShaderLanguage::Glsl
    }

    fn fragment(&self, fragment: Fragment) -> &'static str {
        match fragment {
            // Inputs and outputs are built-in varyings
            Fragment::Preamble | Fragment::SpriteInput | Fragment::Outputs => "",
            Fragment::WorldViewProj => "",
            Fragment::CommonUniforms => "uniform vec3 camPos;\nuniform float fadeRange;\n",
            Fragment::AnimUniforms => concat!(
                "uniform float time;\n",
                "uniform float frequency;\n",
                "uniform vec4 direction;\n",
            ),
            Fragment::GrowUniform => "uniform float grassHeight;\n",
            Fragment::LightUniforms => concat!(
                "uniform vec4 objSpaceLight;\n",
                "uniform vec4 lightDiffuse;\n",
                "uniform vec4 lightAmbient;\n",
            ),
            Fragment::BodyOpen => concat!(
                "\nvoid main()\n{\n",
                "\tvec4 iColor = gl_Color;\n",
                "\tvec2 iUV = gl_MultiTexCoord0.xy;\n",
                "\tvec4 position = gl_Vertex;\n",
                "\tvec4 oColor;\n",
                "\tfloat dist = distance(camPos.xz, position.xz);\n",
            ),
            Fragment::LitColor => concat!(
                "\tvec3 light = normalize(objSpaceLight.xyz - (gl_Vertex.xyz * objSpaceLight.w));\n",
                "\tfloat diffuseFactor = max(dot(vec3(0.0, 1.0, 0.0), light), 0.0);\n",
                "\toColor = (lightAmbient + diffuseFactor * lightDiffuse) * iColor;\n",
            ),
            Fragment::UnlitColor => "\toColor.rgb = iColor.rgb;\n",
            Fragment::AlphaFade => "\toColor.a = 2.0 - (2.0 * dist / fadeRange);\n",
            Fragment::OpaqueAlpha => "\toColor.a = 1.0;\n",
            Fragment::Billboard => concat!(
                "\tvec3 toCamera = position.xyz - camPos;\n",
                "\tvec3 side = normalize(cross(vec3(0.0, 1.0, 0.0), toCamera));\n",
                "\tposition += vec4(side.x * gl_Normal.x, gl_Normal.y, side.z * gl_Normal.x, 0.0);\n",
            ),
            Fragment::Sway => concat!(
                "\tif (iUV.y == 0.0) {\n",
                "\t\tposition += direction * sin(time + gl_Vertex.x * frequency);\n",
                "\t}\n",
            ),
            Fragment::BlendElse => "\telse {\n\t\tposition.y -= 1.0;\n\t}\n",
            Fragment::Blend => "\tif (iUV.y != 0.0) {\n\t\tposition.y -= 1.0;\n\t}\n",
            Fragment::Grow => {
                "\tposition.y -= grassHeight * clamp((2.0 * dist / fadeRange) - 1.0, 0.0, 1.0);\n"
            }
            Fragment::Epilogue => concat!(
                "\tgl_Position = gl_ModelViewProjectionMatrix * position;\n",
                "\tgl_FrontColor = oColor;\n",
                "\tgl_TexCoord[0] = gl_MultiTexCoord0;\n",
                "\tgl_FogFragCoord = gl_Position.z;\n",
                "}\n",
            ),
        }
    }

    fn implicit_world_view_proj(&self) -> bool {
        true
    }

    fn compile_settings(&self) -> &'static [(&'static str, &'static str)] {
        &[]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lookup() {
        for language in [ShaderLanguage::Hlsl, ShaderLanguage::Glsl, ShaderLanguage::Cg] {
            assert_eq!(table_for(language).language(), language);
        }
        assert!(table_for(ShaderLanguage::Glsl).implicit_world_view_proj());
        assert!(!table_for(ShaderLanguage::Hlsl).implicit_world_view_proj());
    }

    #[test]
    fn test_compile_settings() {
        assert_eq!(
            table_for(ShaderLanguage::Hlsl).compile_settings(),
            &[("target", "vs_1_1"), ("entry_point", "main")]
        );
        assert_eq!(
            table_for(ShaderLanguage::Cg).compile_settings(),
            &[("profiles", "vs_1_1 arbvp1"), ("entry_point", "main")]
        );
        assert!(table_for(ShaderLanguage::Glsl).compile_settings().is_empty());
    }
}
