/// One forest container resolved into a TREE record.
use glam::DVec3;

use crate::billboard::{self, Billboard};
use crate::classify::{self, MeshShape, sorted_corners};
use crate::diagnostics::{Diagnostics, MessageCode};
use crate::format::float_to_str;
use crate::horizontal::{self, HorizontalQuad};
use crate::scene::{Scene, SceneObject, TreeContainer};
use crate::settings::MeshSettings;
use crate::texture::TextureLookup;

/// A complex (non-billboard) child destined for a mesh table.
#[derive(Debug, Clone)]
pub struct ComplexObject {
    pub object_name: String,
    pub mesh: crate::scene::MeshData,
    pub material: Option<String>,
    pub settings: MeshSettings,
}

/// Immutable tree record; `freq` is filled in by the aggregator once the
/// whole layer is known.
#[derive(Debug, Clone)]
pub struct ForestTree {
    pub billboard: Billboard,
    pub horizontal: Option<HorizontalQuad>,
    /// Placement frequency in percent, assigned during normalization.
    pub freq: f64,
    pub min_height: f64,
    pub max_height: f64,
    /// Count of vertical quad members: 1 single quad, 2 cross-billboard.
    pub quads: usize,
    pub layer_number: u32,
    /// The authoring container's name, kept for traceability.
    pub notes: String,
    pub weighted_importance: u32,
    /// The vertical quad's material name, shared shader for the document.
    pub material_name: String,
    /// Atlas pixel dimensions resolved from the material's texture.
    pub atlas_size: (u32, u32),
    pub complex_objects: Vec<ComplexObject>,
    pub use_custom_lod: bool,
    pub custom_lod: u32,
}

impl ForestTree {
    /// Classify a container's children and derive its tree record.
    ///
    /// Structural problems are logged against the container and None is
    /// returned; the caller excludes the tree and keeps collecting.
    pub fn build(
        container: &TreeContainer,
        layer_number: u32,
        scene: &Scene,
        textures: &dyn TextureLookup,
        diag: &mut Diagnostics,
    ) -> Option<ForestTree> {
        let subject = Some(container.name.as_str());

        if let Err(problem) = container.settings.validate() {
            diag.error(MessageCode::E013, problem, subject);
            return None;
        }

        let mut verticals: Vec<(&SceneObject, Vec<DVec3>)> = Vec::new();
        let mut horizontals: Vec<(&SceneObject, Vec<DVec3>)> = Vec::new();
        let mut complex_objects: Vec<ComplexObject> = Vec::new();

        for child in &container.children {
            let world = child.world_matrix(&container.transform);
            let positions = child.mesh.world_positions(&world);
            match classify::classify(&child.mesh, &positions) {
                MeshShape::VerticalQuad => verticals.push((child, positions)),
                MeshShape::HorizontalQuad => horizontals.push((child, positions)),
                MeshShape::Complex => {
                    if let Err(problem) = child.settings.validate() {
                        diag.error(MessageCode::E013, problem, Some(child.name.as_str()));
                        return None;
                    }
                    complex_objects.push(ComplexObject {
                        object_name: child.name.clone(),
                        mesh: child.mesh.clone(),
                        material: child.material.clone(),
                        settings: child.settings.clone(),
                    });
                }
                MeshShape::Unknown => {
                    diag.warn(
                        MessageCode::W001,
                        "mesh is neither a billboard quad nor a 3D tree mesh, leaving it out",
                        Some(child.name.as_str()),
                    );
                }
            }
        }

        let Some((vertical, vertical_positions)) = verticals.first() else {
            diag.error(
                MessageCode::E001,
                "no vertical quad found, every tree needs a billboard standing at z 0",
                subject,
            );
            return None;
        };

        if horizontals.len() > 1 {
            diag.error(
                MessageCode::E011,
                format!(
                    "{} horizontal quads found, a tree can carry at most one",
                    horizontals.len()
                ),
                subject,
            );
            return None;
        }

        let atlas_size = resolve_atlas(vertical, scene, textures, diag)?;
        let material_name = vertical
            .material
            .clone()
            .unwrap_or_default();

        let pivot = container.pivot();
        let billboard = match billboard::extract(&vertical.mesh, vertical_positions, pivot, atlas_size)
        {
            Ok(billboard) => billboard,
            Err(problem) => {
                diag.error(MessageCode::E012, problem.to_string(), Some(vertical.name.as_str()));
                return None;
            }
        };

        let horizontal = if let Some((quad, quad_positions)) = horizontals.first() {
            let vertical_bottom = sorted_corners(vertical_positions).bottom_length();
            let quad_pivot = quad.world_pivot(&container.transform);
            let yaw = quad.world_yaw_degrees(&container.transform);
            match horizontal::extract(
                &quad.mesh,
                quad_positions,
                quad_pivot,
                yaw,
                atlas_size,
                &billboard,
                vertical_bottom,
            ) {
                Ok(result) => Some(result),
                Err(problem) => {
                    diag.error(MessageCode::E012, problem.to_string(), Some(quad.name.as_str()));
                    return None;
                }
            }
        } else {
            None
        };

        Some(ForestTree {
            billboard,
            horizontal,
            freq: 0.0,
            min_height: billboard.min_height,
            max_height: container.settings.max_height,
            quads: verticals.len(),
            layer_number,
            notes: container.name.clone(),
            weighted_importance: container.settings.weighted_importance,
            material_name,
            atlas_size,
            complex_objects,
            use_custom_lod: container.settings.use_custom_lod,
            custom_lod: container.settings.custom_lod,
        })
    }

    /// The TREE line, its optional Y_QUAD line, and one MESH_3D reference
    /// per complex object.
    pub fn write_lines(&self) -> Vec<String> {
        let rect = self.billboard.rect;
        let mut lines = vec![format!(
            "TREE\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
            rect.s,
            rect.t,
            rect.w,
            rect.h,
            self.billboard.offset,
            float_to_str(self.freq),
            float_to_str(self.min_height),
            float_to_str(self.max_height),
            self.quads,
            self.layer_number,
            self.notes,
        )];

        if let Some(quad) = &self.horizontal {
            lines.push(format!(
                "Y_QUAD\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                quad.rect.s,
                quad.rect.t,
                quad.rect.w,
                quad.rect.h,
                quad.offset_center_x,
                quad.offset_center_y,
                quad.quad_width,
                quad.elevation,
                float_to_str(quad.psi_rotation),
            ));
        }

        for complex in &self.complex_objects {
            if self.use_custom_lod {
                lines.push(format!("MESH_3D\t{}\t{}", complex.mesh.name, self.custom_lod));
            } else {
                lines.push(format!("MESH_3D\t{}", complex.mesh.name));
            }
        }

        lines
    }
}

/// Resolve the vertical quad's material to atlas pixel dimensions.
fn resolve_atlas(
    quad: &SceneObject,
    scene: &Scene,
    textures: &dyn TextureLookup,
    diag: &mut Diagnostics,
) -> Option<(u32, u32)> {
    let subject = Some(quad.name.as_str());
    let Some(material_name) = &quad.material else {
        diag.error(
            MessageCode::E002,
            "billboard quad has no material, assign the forest atlas material",
            subject,
        );
        return None;
    };
    let Some(material) = scene.material(material_name) else {
        diag.error(
            MessageCode::E002,
            format!("material '{}' is not part of the scene", material_name),
            subject,
        );
        return None;
    };
    if material.texture_path.is_empty() {
        diag.error(
            MessageCode::E002,
            format!("material '{}' has no texture path", material_name),
            subject,
        );
        return None;
    }
    match textures.dimensions(&material.texture_path) {
        Some(dimensions) => Some(dimensions),
        None => {
            diag.error(
                MessageCode::E003,
                format!(
                    "texture '{}' could not be read for its size",
                    material.texture_path
                ),
                subject,
            );
            None
        }
    }
}
