/// Typed authoring settings, one bag per entity kind.
///
/// These replace the host application's dynamic property groups with
/// explicit structs; the pipeline only ever reads plain fields, never a live
/// host object. All bags deserialize with sensible defaults so a scene
/// snapshot only has to spell out what it changes.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-container tree authoring parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeSettings {
    /// Relative placement weight among trees of the same layer, >= 1.
    pub weighted_importance: u32,
    /// Natural height variance ceiling in meters; authored, not derived
    /// from the modeled mesh.
    pub max_height: f64,
    /// Use `custom_lod` as this tree's 3D mesh viewing distance.
    pub use_custom_lod: bool,
    /// Viewing distance in meters for `use_custom_lod`.
    pub custom_lod: u32,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            weighted_importance: 1,
            max_height: 0.0,
            use_custom_lod: false,
            custom_lod: 0,
        }
    }
}

impl TreeSettings {
    /// Bounds check, performed once when a container is collected.
    pub fn validate(&self) -> Result<(), String> {
        if self.weighted_importance < 1 {
            return Err("weighted importance must be at least 1".to_string());
        }
        if self.max_height < 0.0 {
            return Err("max height cannot be negative".to_string());
        }
        Ok(())
    }
}

/// Alpha handling for a shader block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    /// Plain alpha blending, no directive written.
    #[default]
    Blend,
    /// Alpha cutoff at `no_blend_level`.
    NoBlend,
    /// Hash dissolve at `blend_hash_level`.
    BlendHash,
}

/// Normal-map interpretation for a shader block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NormalMode {
    #[default]
    None,
    Metalness,
    Translucency,
}

impl NormalMode {
    /// Directive keyword, or None when no line should be written.
    pub fn directive(&self) -> Option<&'static str> {
        match self {
            NormalMode::None => None,
            NormalMode::Metalness => Some("NORMAL_METALNESS"),
            NormalMode::Translucency => Some("NORMAL_TRANSLUCENCY"),
        }
    }
}

/// Per-material shader parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialSettings {
    /// Atlas texture path, relative to the scenery package.
    pub texture_path: String,
    /// Normal map path; empty disables the TEXTURE_NORMAL directive.
    pub texture_path_normal: String,
    /// Normal map scale ratio written with TEXTURE_NORMAL.
    pub texture_path_normal_ratio: f64,
    pub blend_mode: BlendMode,
    /// Alpha cutoff level in [0, 1], used with `BlendMode::NoBlend`.
    pub no_blend_level: f64,
    /// Dissolve level in [0, 1], used with `BlendMode::BlendHash`.
    pub blend_hash_level: f64,
    pub has_specular: bool,
    /// Specular ratio in [0, 1].
    pub specular: f64,
    pub has_bump_level: bool,
    /// Bump strength in [0, 1].
    pub bump_level: f64,
    pub no_shadow: bool,
    pub shadow_blend: bool,
    pub normal_mode: NormalMode,
}

impl Default for MaterialSettings {
    fn default() -> Self {
        Self {
            texture_path: String::new(),
            texture_path_normal: String::new(),
            texture_path_normal_ratio: 1.0,
            blend_mode: BlendMode::Blend,
            no_blend_level: 0.5,
            blend_hash_level: 0.5,
            has_specular: false,
            specular: 0.0,
            has_bump_level: false,
            bump_level: 0.0,
            no_shadow: false,
            shadow_blend: false,
            normal_mode: NormalMode::None,
        }
    }
}

/// Per-mesh-data parameters for complex (3D) objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshSettings {
    /// Nearest draw distance of the 3D mesh in meters.
    pub lod_near: u32,
    /// Farthest draw distance in meters, >= 1.
    pub lod_far: u32,
    /// Wind bend fallback for vertices without a first group channel.
    pub wind_bend_ratio: f64,
    /// Branch stiffness fallback for the second channel.
    pub branch_stiffness: f64,
    /// Wind speed fallback for the third channel.
    pub wind_speed: f64,
    pub no_shadow: bool,
}

impl Default for MeshSettings {
    fn default() -> Self {
        Self {
            lod_near: 0,
            lod_far: 500,
            wind_bend_ratio: 0.0,
            branch_stiffness: 0.0,
            wind_speed: 0.0,
            no_shadow: false,
        }
    }
}

impl MeshSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.lod_far < 1 {
            return Err("LOD far must be at least 1 meter".to_string());
        }
        Ok(())
    }
}

/// Surface types a forest can be excluded from, in the .for format's fixed
/// directive order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceType {
    Water,
    Concrete,
    Asphalt,
    Grass,
    Dirt,
    Gravel,
    Lakebed,
    Snow,
    Shoulder,
    Blastpad,
}

impl SurfaceType {
    pub const ALL: [SurfaceType; 10] = [
        SurfaceType::Water,
        SurfaceType::Concrete,
        SurfaceType::Asphalt,
        SurfaceType::Grass,
        SurfaceType::Dirt,
        SurfaceType::Gravel,
        SurfaceType::Lakebed,
        SurfaceType::Snow,
        SurfaceType::Shoulder,
        SurfaceType::Blastpad,
    ];

    pub fn keyword(&self) -> &'static str {
        match self {
            SurfaceType::Water => "water",
            SurfaceType::Concrete => "concrete",
            SurfaceType::Asphalt => "asphalt",
            SurfaceType::Grass => "grass",
            SurfaceType::Dirt => "dirt",
            SurfaceType::Gravel => "gravel",
            SurfaceType::Lakebed => "lakebed",
            SurfaceType::Snow => "snow",
            SurfaceType::Shoulder => "shoulder",
            SurfaceType::Blastpad => "blastpad",
        }
    }
}

/// One perlin noise block: 1-4 (amplitude, wavelength) pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerlinParams {
    pub pairs: Vec<(f64, f64)>,
}

impl PerlinParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.pairs.is_empty() || self.pairs.len() > 4 {
            return Err(format!(
                "perlin blocks take 1 to 4 amplitude/wavelength pairs, found {}",
                self.pairs.len()
            ));
        }
        Ok(())
    }
}

/// Per-root-collection export parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectionSettings {
    /// Output file name; the root collection's name is used when empty.
    pub file_name: String,
    /// Grid cell size in meters (x, y).
    pub spacing: (f64, f64),
    /// Grid deviation allowance in meters (x, y).
    pub randomness: (f64, f64),
    /// Farthest viewing distance; the LOD line is only written when set.
    pub max_lod: Option<u32>,
    pub cast_shadow: bool,
    pub perlin_density: Option<PerlinParams>,
    pub perlin_choice: Option<PerlinParams>,
    pub perlin_height: Option<PerlinParams>,
    /// Surfaces the forest must not appear on; written in format order,
    /// repeats collapsed.
    pub skip_surfaces: Vec<SurfaceType>,
    /// Layer number -> percentage for GROUP directives. Consulted only when
    /// perlin choice parameters are enabled.
    pub group_percentages: Option<BTreeMap<u32, f64>>,
}

impl Default for CollectionSettings {
    fn default() -> Self {
        Self {
            file_name: String::new(),
            spacing: (0.0, 0.0),
            randomness: (0.0, 0.0),
            max_lod: None,
            cast_shadow: true,
            perlin_density: None,
            perlin_choice: None,
            perlin_height: None,
            skip_surfaces: Vec::new(),
            group_percentages: None,
        }
    }
}

impl CollectionSettings {
    pub fn validate(&self) -> Result<(), String> {
        for (name, params) in [
            ("density", &self.perlin_density),
            ("choice", &self.perlin_choice),
            ("height", &self.perlin_height),
        ] {
            if let Some(params) = params {
                params
                    .validate()
                    .map_err(|e| format!("perlin {} block: {}", name, e))?;
            }
        }
        Ok(())
    }
}
