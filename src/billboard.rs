/// Sprite extraction for the vertical billboard quad.
///
/// The billboard's atlas rectangle comes from its UV corners, its pivot
/// offset and real-world height from the quad's world-space geometry.
use glam::DVec3;
use std::fmt;

use crate::classify::sorted_corners;
use crate::scene::MeshData;

/// UV extraction failures; fatal to the tree being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuadUvError {
    MissingLayer,
    TooFewCorners(usize),
}

impl fmt::Display for QuadUvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuadUvError::MissingLayer => write!(f, "quad has no active UV layer"),
            QuadUvError::TooFewCorners(found) => {
                write!(f, "quad UVs have {} distinct corners, expected 4", found)
            }
        }
    }
}

impl std::error::Error for QuadUvError {}

/// Integer pixel rectangle within the atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub s: i64,
    pub t: i64,
    pub w: i64,
    pub h: i64,
}

/// Sprite rectangle, pivot offset and modeled height of one billboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Billboard {
    pub rect: PixelRect,
    /// Pixel distance from the sprite's left edge to the tree's pivot.
    pub offset: i64,
    /// Real-world vertical extent of the quad, in meters.
    pub min_height: f64,
}

/// Pixel rectangle of a quad's UV footprint on the atlas.
///
/// Corners are sorted lexicographically by (u, v); the first is the sprite's
/// bottom-left, the last its top-right.
pub fn uv_rect(mesh: &MeshData, atlas_size: (u32, u32)) -> Result<PixelRect, QuadUvError> {
    let corners = mesh.sorted_uv_corners().ok_or(QuadUvError::MissingLayer)?;
    if corners.len() < 4 {
        return Err(QuadUvError::TooFewCorners(corners.len()));
    }
    let bottom_left = corners[0];
    let top_right = corners[corners.len() - 1];
    let (atlas_w, atlas_h) = (atlas_size.0 as f64, atlas_size.1 as f64);
    let s = (bottom_left.x * atlas_w).round() as i64;
    let t = (bottom_left.y * atlas_h).round() as i64;
    Ok(PixelRect {
        s,
        t,
        w: (top_right.x * atlas_w).round() as i64 - s,
        h: (top_right.y * atlas_h).round() as i64 - t,
    })
}

/// Derive the billboard record from a classified vertical quad.
///
/// `world_positions` are the quad's four vertices in world space, `pivot`
/// the owning container's world pivot.
pub fn extract(
    mesh: &MeshData,
    world_positions: &[DVec3],
    pivot: DVec3,
    atlas_size: (u32, u32),
) -> Result<Billboard, QuadUvError> {
    let rect = uv_rect(mesh, atlas_size)?;
    let corners = sorted_corners(world_positions);
    let bottom_length = corners.bottom_length();
    let offset = (((pivot.x - corners.bottom_left.x) / bottom_length) * rect.w as f64).round();
    Ok(Billboard {
        rect,
        offset: offset as i64,
        min_height: corners.left_length(),
    })
}
