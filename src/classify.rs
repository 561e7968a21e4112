/// World-space mesh shape classification.
///
/// Decides what role each child of a tree container plays: the vertical
/// billboard, an optional horizontal canopy quad, or a complex 3D object
/// destined for a mesh table.
use glam::DVec3;

use crate::constants::{GEOMETRY_TOLERANCE, PRECISION_GEOMETRY};
use crate::format::round_to;
use crate::scene::MeshData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshShape {
    /// Rectangle standing on the ground plane: the billboard.
    VerticalQuad,
    /// Rectangle lying flat at some elevation: canopy spread.
    HorizontalQuad,
    /// More than one face and no quad interpretation: a 3D mesh table.
    Complex,
    /// Nothing this exporter understands; skipped with a warning.
    Unknown,
}

/// The four corners of a quad after lexicographic (x, y, z) vertex sorting.
/// For a vertical quad "top" means +z, for a horizontal quad it means +y.
#[derive(Debug, Clone, Copy)]
pub struct QuadCorners {
    pub bottom_left: DVec3,
    pub top_left: DVec3,
    pub bottom_right: DVec3,
    pub top_right: DVec3,
}

impl QuadCorners {
    pub fn bottom_length(&self) -> f64 {
        self.bottom_right.distance(self.bottom_left)
    }

    pub fn left_length(&self) -> f64 {
        self.top_left.distance(self.bottom_left)
    }
}

/// Sort a quad's four world-space vertices into named corners.
pub fn sorted_corners(positions: &[DVec3]) -> QuadCorners {
    let mut sorted = positions.to_vec();
    sorted.sort_by(|a, b| {
        a.x.total_cmp(&b.x)
            .then(a.y.total_cmp(&b.y))
            .then(a.z.total_cmp(&b.z))
    });
    QuadCorners {
        bottom_left: sorted[0],
        top_left: sorted[1],
        bottom_right: sorted[2],
        top_right: sorted[3],
    }
}

/// Classify a mesh given its world-space vertex positions.
pub fn classify(mesh: &MeshData, world_positions: &[DVec3]) -> MeshShape {
    if is_rectangle(mesh, world_positions) {
        let corners = sorted_corners(world_positions);
        if is_vertical(&corners) {
            return MeshShape::VerticalQuad;
        }
        if is_horizontal(world_positions) {
            return MeshShape::HorizontalQuad;
        }
    }
    if mesh.polygons.len() > 1 {
        MeshShape::Complex
    } else {
        MeshShape::Unknown
    }
}

/// True for a 4-edge, 4-vertex mesh whose corner angles are right angles
/// and whose opposite edges have equal length. Rigid motion and uniform or
/// non-uniform axis scaling keep a rectangle a rectangle; shearing one pair
/// of edges apart does not.
pub fn is_rectangle(mesh: &MeshData, world_positions: &[DVec3]) -> bool {
    if mesh.edges.len() != 4 || world_positions.len() != 4 {
        return false;
    }

    for vertex in 0..4u32 {
        let neighbors: Vec<DVec3> = mesh
            .edges
            .iter()
            .filter(|edge| edge.contains(&vertex))
            .map(|edge| {
                let other = if edge[0] == vertex { edge[1] } else { edge[0] };
                world_positions[other as usize]
            })
            .collect();
        if neighbors.len() != 2 {
            return false;
        }
        let a = neighbors[0] - world_positions[vertex as usize];
        let b = neighbors[1] - world_positions[vertex as usize];
        let angle = a.angle_between(b).to_degrees();
        if round_to(angle, PRECISION_GEOMETRY) != 90.0 {
            return false;
        }
    }

    let lengths: Vec<f64> = mesh
        .edges
        .iter()
        .map(|edge| world_positions[edge[0] as usize].distance(world_positions[edge[1] as usize]))
        .collect();
    (lengths[0] - lengths[2]).abs() <= GEOMETRY_TOLERANCE
        && (lengths[1] - lengths[3]).abs() <= GEOMETRY_TOLERANCE
}

/// True when the quad stands on the ground: both bottom corners at world
/// z = 0, both top corners above it. Perpendicularity to the ground is
/// deliberately not enforced; the author's intent is trusted.
pub fn is_vertical(corners: &QuadCorners) -> bool {
    corners.bottom_left.z.abs() <= GEOMETRY_TOLERANCE
        && corners.bottom_right.z.abs() <= GEOMETRY_TOLERANCE
        && corners.top_left.z > 0.0
        && corners.top_right.z > 0.0
}

/// True when every vertex shares one world z value.
pub fn is_horizontal(world_positions: &[DVec3]) -> bool {
    let Some(first) = world_positions.first() else {
        return false;
    };
    world_positions
        .iter()
        .all(|p| (p.z - first.z).abs() <= GEOMETRY_TOLERANCE)
}
