/// Plain-data scene model consumed by the export pipeline.
///
/// The host authoring tool owns the real scene graph; a run works against
/// this snapshot of it. Containers hold the quads and complex meshes of one
/// tree, layer groups name the distribution layer, roots become files.
use glam::{DMat4, DQuat, DVec2, DVec3, EulerRot};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::settings::{CollectionSettings, MaterialSettings, MeshSettings, TreeSettings};

fn default_true() -> bool {
    true
}

fn default_scale() -> DVec3 {
    DVec3::ONE
}

/// Root aggregate of one scene snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub roots: Vec<RootCollection>,
    /// Materials shared by name between quads and complex objects.
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialSettings>,
}

impl Scene {
    /// Exportable, currently visible roots in authoring order.
    pub fn exportable_roots(&self) -> Vec<&RootCollection> {
        self.roots
            .iter()
            .filter(|root| root.exportable && root.visible)
            .collect()
    }

    pub fn material(&self, name: &str) -> Option<&MaterialSettings> {
        self.materials.get(name)
    }
}

/// A top-level collection that becomes one .for file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootCollection {
    pub name: String,
    #[serde(default = "default_true")]
    pub exportable: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub settings: CollectionSettings,
    #[serde(default)]
    pub groups: Vec<LayerGroup>,
}

/// A distribution layer. The layer number is the integer prefix of the
/// group's name ("2 Conifers" -> 2).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerGroup {
    pub name: String,
    #[serde(default)]
    pub containers: Vec<TreeContainer>,
}

/// One tree: a container whose mesh children are quads and complex objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeContainer {
    pub name: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub settings: TreeSettings,
    #[serde(default)]
    pub children: Vec<SceneObject>,
}

impl TreeContainer {
    /// World-space pivot of the container.
    pub fn pivot(&self) -> DVec3 {
        self.transform.translation
    }
}

/// A mesh-carrying child of a tree container.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    #[serde(default)]
    pub transform: Transform,
    pub mesh: MeshData,
    /// Material name, resolved through `Scene::material`.
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub settings: MeshSettings,
}

impl SceneObject {
    /// World transform under the given parent.
    pub fn world_matrix(&self, parent: &Transform) -> DMat4 {
        parent.matrix() * self.transform.matrix()
    }

    /// World-space pivot under the given parent.
    pub fn world_pivot(&self, parent: &Transform) -> DVec3 {
        parent.matrix().transform_point3(self.transform.translation)
    }

    /// World rotation about the vertical axis, in degrees.
    pub fn world_yaw_degrees(&self, parent: &Transform) -> f64 {
        let rotation = parent.quat() * self.transform.quat();
        rotation.to_euler(EulerRot::ZYX).0.to_degrees()
    }
}

/// Translation / euler rotation (degrees) / scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub translation: DVec3,
    /// Euler XYZ rotation in degrees.
    pub rotation: DVec3,
    pub scale: DVec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: DVec3::ZERO,
            rotation: DVec3::ZERO,
            scale: default_scale(),
        }
    }
}

impl Transform {
    pub fn quat(&self) -> DQuat {
        DQuat::from_euler(
            EulerRot::XYZ,
            self.rotation.x.to_radians(),
            self.rotation.y.to_radians(),
            self.rotation.z.to_radians(),
        )
    }

    pub fn matrix(&self) -> DMat4 {
        DMat4::from_scale_rotation_translation(self.scale, self.quat(), self.translation)
    }
}

/// Read-only view of a mesh: vertices, edges, polygon loops, active UVs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshData {
    /// Mesh datablock name; mesh tables are deduplicated by it.
    pub name: String,
    pub vertices: Vec<MeshVertex>,
    #[serde(default)]
    pub edges: Vec<[u32; 2]>,
    pub polygons: Vec<Polygon>,
    /// Active UV layer: one coordinate per polygon loop, flattened in
    /// polygon order.
    #[serde(default)]
    pub uv: Option<Vec<DVec2>>,
    /// Vertex group names; weights reference these by index.
    #[serde(default)]
    pub vertex_groups: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeshVertex {
    pub position: DVec3,
    #[serde(default)]
    pub weights: Vec<GroupWeight>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GroupWeight {
    pub group: u32,
    pub weight: f64,
}

/// One authored face. `vertices` is the loop in authoring order; split
/// normals, when present, are per-loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<u32>,
    pub normal: DVec3,
    #[serde(default)]
    pub smooth: bool,
    #[serde(default)]
    pub split_normals: Option<Vec<DVec3>>,
}

impl MeshData {
    /// Vertex positions transformed by the given world matrix.
    pub fn world_positions(&self, world: &DMat4) -> Vec<DVec3> {
        self.vertices
            .iter()
            .map(|v| world.transform_point3(v.position))
            .collect()
    }

    /// Starting flattened-loop index of each polygon.
    pub fn loop_starts(&self) -> Vec<usize> {
        let mut starts = Vec::with_capacity(self.polygons.len());
        let mut next = 0;
        for polygon in &self.polygons {
            starts.push(next);
            next += polygon.vertices.len();
        }
        starts
    }

    /// Distinct corners of the active UV layer, sorted lexicographically by
    /// (u, v). None when the mesh has no active layer.
    pub fn sorted_uv_corners(&self) -> Option<Vec<DVec2>> {
        let uv = self.uv.as_ref()?;
        let mut corners: Vec<DVec2> = Vec::new();
        for coord in uv {
            if !corners
                .iter()
                .any(|c| c.x.to_bits() == coord.x.to_bits() && c.y.to_bits() == coord.y.to_bits())
            {
                corners.push(*coord);
            }
        }
        corners.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        Some(corners)
    }

    /// The vertex's weight in the given group, 0 for non-members.
    pub fn weight_in_group(&self, vertex: usize, group: u32) -> f64 {
        self.vertices[vertex]
            .weights
            .iter()
            .find(|w| w.group == group)
            .map_or(0.0, |w| w.weight)
    }
}
