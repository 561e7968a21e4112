/// Header, shader block, and perlin parameter emission.
use crate::diagnostics::{Diagnostics, MessageCode};
use crate::format::float_to_str;
use crate::scene::Scene;
use crate::settings::{BlendMode, CollectionSettings, MaterialSettings, PerlinParams};
use crate::tree::ForestTree;

/// Collected header state for one document: the shared shader materials and
/// the atlas scale.
pub struct Header {
    shader_2d: Option<MaterialSettings>,
    shader_3d: Option<MaterialSettings>,
    scale: (u32, u32),
}

impl Header {
    /// Gather shader materials and atlas scale from the collected trees.
    /// Must run after tree collection; inconsistent materials are logged
    /// against the root and leave the corresponding block empty.
    pub fn collect(
        root_name: &str,
        trees: &[ForestTree],
        scene: &Scene,
        diag: &mut Diagnostics,
    ) -> Header {
        let subject = Some(root_name);

        let mut shader_2d_names: Vec<&str> = trees
            .iter()
            .map(|tree| tree.material_name.as_str())
            .collect();
        shader_2d_names.sort_unstable();
        shader_2d_names.dedup();
        let shader_2d = match shader_2d_names.as_slice() {
            [single] => scene.material(single).cloned(),
            _ => {
                diag.error(
                    MessageCode::E007,
                    "billboard quads use more than one material, a forest has one 2D shader",
                    subject,
                );
                None
            }
        };

        let mut shader_3d_names: Vec<&str> = trees
            .iter()
            .flat_map(|tree| tree.complex_objects.iter())
            .filter_map(|complex| complex.material.as_deref())
            .collect();
        shader_3d_names.sort_unstable();
        shader_3d_names.dedup();
        let shader_3d = match shader_3d_names.as_slice() {
            [] => None,
            [single] => scene.material(single).cloned(),
            _ => {
                diag.error(
                    MessageCode::E008,
                    "3D tree meshes use more than one material, a forest has one 3D shader",
                    subject,
                );
                None
            }
        };

        let scale = trees.first().map_or((0, 0), |tree| tree.atlas_size);

        Header {
            shader_2d,
            shader_3d,
            scale,
        }
    }

    /// Header text through the perlin blocks, ready for mesh tables and
    /// tree records to follow.
    pub fn write(&self, settings: &CollectionSettings) -> String {
        let mut o = String::new();
        o.push_str("A\n800\nFOREST\n");

        if let Some(material) = &self.shader_2d {
            o.push('\n');
            o.push_str(&write_shader("SHADER_2D", material));
            o.push('\n');
        }
        if let Some(material) = &self.shader_3d {
            o.push('\n');
            o.push_str(&write_shader("SHADER_3D", material));
            o.push('\n');
        }

        o.push('\n');
        let mut directives: Vec<String> = Vec::new();
        if let Some(max_lod) = settings.max_lod {
            directives.push(format!("LOD\t{}", max_lod));
        }
        directives.push(format!("SCALE_X\t{}", self.scale.0));
        directives.push(format!("SCALE_Y\t{}", self.scale.1));
        directives.push(format!(
            "SPACING\t{} {}",
            float_to_str(settings.spacing.0),
            float_to_str(settings.spacing.1)
        ));
        directives.push(format!(
            "RANDOM\t{} {}",
            float_to_str(settings.randomness.0),
            float_to_str(settings.randomness.1)
        ));
        if !settings.cast_shadow {
            directives.push("NO_SHADOW".to_string());
        }
        o.push_str(&directives.join("\n"));
        o.push('\n');

        let perlin = write_perlin_params(settings);
        if !perlin.is_empty() {
            o.push_str(&perlin);
            o.push('\n');
        }

        o
    }
}

fn write_perlin_params(settings: &CollectionSettings) -> String {
    let blocks: Vec<String> = [
        ("DENSITY_PARAMS", &settings.perlin_density),
        ("CHOICE_PARAMS", &settings.perlin_choice),
        ("HEIGHT_PARAMS", &settings.perlin_height),
    ]
    .iter()
    .filter_map(|(directive, params)| {
        params
            .as_ref()
            .map(|params| fmt_perlin_params(directive, params))
    })
    .collect();
    blocks.join("\n")
}

fn fmt_perlin_params(directive: &str, params: &PerlinParams) -> String {
    let pairs: Vec<String> = params
        .pairs
        .iter()
        .map(|(amplitude, wavelength)| {
            format!("{} {}", float_to_str(*amplitude), float_to_str(*wavelength))
        })
        .collect();
    format!("{} {}", directive, pairs.join("\t"))
}

/// One shader block: the bare keyword line followed by tab-indented
/// directives in the format's fixed order.
fn write_shader(keyword: &str, material: &MaterialSettings) -> String {
    let mut lines = vec![keyword.to_string()];
    lines.push(format!("TEXTURE {}", clean_path(&material.texture_path)));
    if !material.texture_path_normal.is_empty() {
        lines.push(format!(
            "TEXTURE_NORMAL {}\t{}",
            float_to_str(material.texture_path_normal_ratio),
            clean_path(&material.texture_path_normal)
        ));
    }
    match material.blend_mode {
        BlendMode::Blend => {}
        BlendMode::NoBlend => {
            lines.push(format!("NO_BLEND {}", float_to_str(material.no_blend_level)));
        }
        BlendMode::BlendHash => lines.push(format!(
            "BLEND_HASH {}",
            float_to_str(material.blend_hash_level)
        )),
    }
    if material.has_specular {
        lines.push(format!("SPECULAR {}", float_to_str(material.specular)));
    }
    if material.has_bump_level {
        lines.push(format!("BUMP_LEVEL {}", float_to_str(material.bump_level)));
    }
    if material.no_shadow {
        lines.push("NO_SHADOW".to_string());
    }
    if material.shadow_blend {
        lines.push("SHADOW_BLEND".to_string());
    }
    if let Some(directive) = material.normal_mode.directive() {
        lines.push(directive.to_string());
    }

    let mut block = String::new();
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            block.push_str("\n\t");
        }
        block.push_str(line);
    }
    block
}

/// Texture paths are written with forward slashes and without the authoring
/// tool's leading relative-path marker.
fn clean_path(path: &str) -> String {
    path.replace("//", "").replace('\\', "/")
}
