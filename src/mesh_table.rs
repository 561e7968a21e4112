/// MESH/VERTEX/IDX table generation for complex objects.
///
/// Corners are deduplicated by their full attribute tuple, never by
/// position alone: two corners sharing a location but not a normal or UV
/// stay distinct entries. Index assignment is first-seen order so repeated
/// builds of the same mesh produce identical tables.
use glam::{DVec2, DVec3};
use std::collections::HashMap;

use crate::constants::INDICES_PER_LINE;
use crate::coordinates::to_xplane;
use crate::format::float_to_str;
use crate::scene::MeshData;
use crate::settings::MeshSettings;
use crate::tree::ComplexObject;

/// One deduplicated vertex in the export coordinate convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableVertex {
    pub position: DVec3,
    pub normal: DVec3,
    pub uv: DVec2,
    /// Wind channels: bend ratio, branch stiffness, wind speed.
    pub weights: [f64; 3],
}

impl TableVertex {
    fn key(&self) -> VertexKey {
        VertexKey {
            position: [
                self.position.x.to_bits(),
                self.position.y.to_bits(),
                self.position.z.to_bits(),
            ],
            normal: [
                self.normal.x.to_bits(),
                self.normal.y.to_bits(),
                self.normal.z.to_bits(),
            ],
            uv: [self.uv.x.to_bits(), self.uv.y.to_bits()],
            weights: [
                self.weights[0].to_bits(),
                self.weights[1].to_bits(),
                self.weights[2].to_bits(),
            ],
        }
    }

    fn write(&self) -> String {
        format!(
            "VERTEX\t{} {} {}\t{} {} {}\t{}\t{}\t{} {} {}",
            float_to_str(self.position.x),
            float_to_str(self.position.y),
            float_to_str(self.position.z),
            float_to_str(self.normal.x),
            float_to_str(self.normal.y),
            float_to_str(self.normal.z),
            float_to_str(self.uv.x),
            float_to_str(self.uv.y),
            float_to_str(self.weights[0]),
            float_to_str(self.weights[1]),
            float_to_str(self.weights[2]),
        )
    }
}

/// Bit-exact attribute identity; hashing floats by their bit patterns keeps
/// the map free of tolerance surprises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct VertexKey {
    position: [u64; 3],
    normal: [u64; 3],
    uv: [u64; 2],
    weights: [u64; 3],
}

/// One emitted mesh table.
#[derive(Debug, Clone)]
pub struct MeshTable {
    pub name: String,
    pub lod_near: u32,
    pub lod_far: u32,
    pub no_shadow: bool,
    pub vertices: Vec<TableVertex>,
    pub indices: Vec<u32>,
}

/// Build the deduplicated table for one complex object.
pub fn build(object: &ComplexObject) -> MeshTable {
    let mesh = &object.mesh;
    let settings = &object.settings;
    let loop_starts = mesh.loop_starts();

    let mut vertices: Vec<TableVertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    let mut seen: HashMap<VertexKey, u32> = HashMap::new();

    for (polygon_index, polygon) in mesh.polygons.iter().enumerate() {
        let base = loop_starts[polygon_index];
        for triangle in fan_triangles(polygon.vertices.len()) {
            // Corners are visited backwards to convert the authoring tool's
            // counter-clockwise winding into X-Plane's clockwise order.
            for &corner in triangle.iter().rev() {
                let vertex = corner_vertex(mesh, settings, polygon_index, base, corner);
                let key = vertex.key();
                let index = match seen.get(&key) {
                    Some(&index) => index,
                    None => {
                        let index = vertices.len() as u32;
                        vertices.push(vertex);
                        seen.insert(key, index);
                        index
                    }
                };
                indices.push(index);
            }
        }
    }

    MeshTable {
        name: mesh.name.clone(),
        lod_near: settings.lod_near,
        lod_far: settings.lod_far,
        no_shadow: settings.no_shadow,
        vertices,
        indices,
    }
}

impl MeshTable {
    /// The MESH header line, one VERTEX line per entry, and IDX lines
    /// grouped ten indices apiece.
    pub fn write(&self) -> String {
        let mut o = String::new();
        o.push_str(&format!(
            "MESH\t{}\t{}\t{}\t{}\t{}\n",
            self.name,
            self.lod_near,
            self.lod_far,
            self.vertices.len(),
            self.indices.len()
        ));
        if self.no_shadow {
            o.push_str("NO_SHADOW\n");
        }
        for vertex in &self.vertices {
            o.push_str(&vertex.write());
            o.push('\n');
        }
        for chunk in self.indices.chunks(INDICES_PER_LINE) {
            let joined: Vec<String> = chunk.iter().map(u32::to_string).collect();
            o.push_str(&format!("IDX\t{}\n", joined.join("\t")));
        }
        o
    }
}

/// Fan triangulation of an n-gon loop: (0, i, i+1).
fn fan_triangles(loop_len: usize) -> Vec<[usize; 3]> {
    if loop_len < 3 {
        return Vec::new();
    }
    (1..loop_len - 1).map(|i| [0, i, i + 1]).collect()
}

/// The attribute tuple of one triangle corner, in export space.
fn corner_vertex(
    mesh: &MeshData,
    settings: &MeshSettings,
    polygon_index: usize,
    loop_base: usize,
    corner: usize,
) -> TableVertex {
    let polygon = &mesh.polygons[polygon_index];
    let vertex_index = polygon.vertices[corner] as usize;
    let loop_index = loop_base + corner;

    let position = to_xplane(mesh.vertices[vertex_index].position);
    let authoring_normal = if polygon.smooth {
        polygon
            .split_normals
            .as_ref()
            .map_or(polygon.normal, |normals| normals[corner])
    } else {
        polygon.normal
    };
    let normal = to_xplane(authoring_normal);
    let uv = mesh
        .uv
        .as_ref()
        .map_or(DVec2::ZERO, |layer| layer[loop_index]);

    TableVertex {
        position,
        normal,
        uv,
        weights: channel_weights(mesh, settings, vertex_index),
    }
}

/// Wind channel values for one vertex: the mesh's first three vertex groups
/// in group order, 0 for non-members; slots without a group fall back to
/// the authored per-mesh constants.
fn channel_weights(mesh: &MeshData, settings: &MeshSettings, vertex_index: usize) -> [f64; 3] {
    let defaults = [
        settings.wind_bend_ratio,
        settings.branch_stiffness,
        settings.wind_speed,
    ];
    let mut weights = defaults;
    for (slot, weight) in weights.iter_mut().enumerate() {
        if slot < mesh.vertex_groups.len() {
            *weight = mesh.weight_in_group(vertex_index, slot as u32);
        }
    }
    weights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{GroupWeight, MeshVertex, Polygon};

    fn triangle_object() -> ComplexObject {
        let mesh = MeshData {
            name: "trunk".to_string(),
            vertices: vec![
                MeshVertex {
                    position: DVec3::new(0.0, 0.0, 0.0),
                    weights: Vec::new(),
                },
                MeshVertex {
                    position: DVec3::new(1.0, 0.0, 0.0),
                    weights: Vec::new(),
                },
                MeshVertex {
                    position: DVec3::new(0.0, 0.0, 1.0),
                    weights: Vec::new(),
                },
            ],
            edges: vec![[0, 1], [1, 2], [2, 0]],
            polygons: vec![Polygon {
                vertices: vec![0, 1, 2],
                normal: DVec3::NEG_Y,
                smooth: false,
                split_normals: None,
            }],
            uv: None,
            vertex_groups: Vec::new(),
        };
        ComplexObject {
            object_name: "trunk".to_string(),
            mesh,
            material: None,
            settings: MeshSettings::default(),
        }
    }

    fn two_quad_object() -> ComplexObject {
        // Two quads sharing an edge, so corner dedup has something to find.
        let positions = [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 0.0, 1.0],
            [0.0, 0.0, 1.0],
            [2.0, 0.0, 0.0],
            [2.0, 0.0, 1.0],
        ];
        let mesh = MeshData {
            name: "wall".to_string(),
            vertices: positions
                .iter()
                .map(|p| MeshVertex {
                    position: DVec3::from_array(*p),
                    weights: Vec::new(),
                })
                .collect(),
            edges: vec![
                [0, 1],
                [1, 2],
                [2, 3],
                [3, 0],
                [1, 4],
                [4, 5],
                [5, 2],
            ],
            polygons: vec![
                Polygon {
                    vertices: vec![0, 1, 2, 3],
                    normal: DVec3::NEG_Y,
                    smooth: false,
                    split_normals: None,
                },
                Polygon {
                    vertices: vec![1, 4, 5, 2],
                    normal: DVec3::NEG_Y,
                    smooth: false,
                    split_normals: None,
                },
            ],
            uv: None,
            vertex_groups: Vec::new(),
        };
        ComplexObject {
            object_name: "wall".to_string(),
            mesh,
            material: None,
            settings: MeshSettings::default(),
        }
    }

    #[test]
    fn single_triangle_winding_is_reversed() {
        let table = build(&triangle_object());
        // First-seen order after reversal: authoring corners 2, 1, 0.
        assert_eq!(table.indices, vec![0, 1, 2]);
        assert_eq!(table.vertices[0].position, to_xplane(DVec3::new(0.0, 0.0, 1.0)));
        assert_eq!(table.vertices[1].position, to_xplane(DVec3::new(1.0, 0.0, 0.0)));
        assert_eq!(table.vertices[2].position, to_xplane(DVec3::ZERO));
    }

    #[test]
    fn shared_corners_deduplicate_to_one_entry() {
        let table = build(&two_quad_object());
        // 4 triangles x 3 corners, but only 6 distinct attribute tuples.
        assert_eq!(table.indices.len(), 12);
        assert_eq!(table.vertices.len(), 6);
    }

    #[test]
    fn rebuilding_yields_identical_tables() {
        let object = two_quad_object();
        let first = build(&object);
        let second = build(&object);
        assert_eq!(first.indices, second.indices);
        assert_eq!(first.vertices, second.vertices);
    }

    #[test]
    fn differing_normals_keep_shared_positions_distinct() {
        let mut object = two_quad_object();
        object.mesh.polygons[1].normal = DVec3::Z;
        let table = build(&object);
        // The shared edge's two corners now split by normal.
        assert_eq!(table.vertices.len(), 8);
    }

    #[test]
    fn indices_group_ten_per_line() {
        let table = build(&two_quad_object());
        let output = table.write();
        let idx_lines: Vec<&str> = output
            .lines()
            .filter(|line| line.starts_with("IDX"))
            .collect();
        assert_eq!(idx_lines.len(), 2);
        assert_eq!(idx_lines[0].split('\t').count(), 11);
        assert_eq!(idx_lines[1].split('\t').count(), 3);
    }

    #[test]
    fn wind_channels_fall_back_to_mesh_settings() {
        let mut object = triangle_object();
        object.settings.wind_bend_ratio = 0.25;
        object.settings.branch_stiffness = 0.75;
        object.settings.wind_speed = 2.0;
        let table = build(&object);
        assert_eq!(table.vertices[0].weights, [0.25, 0.75, 2.0]);
    }

    #[test]
    fn grouped_vertices_use_their_authored_weights() {
        let mut object = triangle_object();
        object.mesh.vertex_groups = vec!["wind_bend".to_string()];
        object.mesh.vertices[2].weights = vec![GroupWeight {
            group: 0,
            weight: 0.9,
        }];
        object.settings.branch_stiffness = 0.5;
        let table = build(&object);
        // Vertex 2 is first after winding reversal.
        assert_eq!(table.vertices[0].weights, [0.9, 0.5, 0.0]);
        assert_eq!(table.vertices[2].weights, [0.0, 0.5, 0.0]);
    }
}
