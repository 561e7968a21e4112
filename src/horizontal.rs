/// Y_QUAD extraction for the optional horizontal canopy quad.
///
/// The horizontal quad shares the billboard's pixel scale in the output
/// format, so its physical width and trunk elevation are re-expressed in
/// the vertical sprite's pixel units.
use glam::DVec3;

use crate::billboard::{Billboard, PixelRect, QuadUvError, uv_rect};
use crate::classify::sorted_corners;
use crate::scene::MeshData;

/// Canopy-spread placement record attached to a tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HorizontalQuad {
    pub rect: PixelRect,
    /// Pixel offset of the object pivot from the quad's bottom-left corner.
    pub offset_center_x: i64,
    pub offset_center_y: i64,
    /// The quad's physical width in the vertical billboard's pixel scale.
    pub quad_width: i64,
    /// Pixel position up the trunk, proportional to the modeled height.
    pub elevation: i64,
    /// World rotation about the vertical axis, in whole degrees.
    pub psi_rotation: f64,
}

/// Derive the Y_QUAD record from a classified horizontal quad.
///
/// `vertical_bottom_length` is the billboard quad's world-space bottom edge
/// length, used to translate meters into the shared pixel scale.
pub fn extract(
    mesh: &MeshData,
    world_positions: &[DVec3],
    pivot: DVec3,
    yaw_degrees: f64,
    atlas_size: (u32, u32),
    billboard: &Billboard,
    vertical_bottom_length: f64,
) -> Result<HorizontalQuad, QuadUvError> {
    let rect = uv_rect(mesh, atlas_size)?;
    let corners = sorted_corners(world_positions);
    let bottom_length = corners.bottom_length();
    let left_length = corners.left_length();

    let offset_center_x =
        (((pivot.x - corners.bottom_left.x) / bottom_length) * rect.w as f64).round() as i64;
    let offset_center_y =
        (((pivot.y - corners.bottom_left.y) / left_length) * rect.h as f64).round() as i64;
    let quad_width =
        ((bottom_length / vertical_bottom_length) * billboard.rect.w as f64).round() as i64;
    let elevation = ((pivot.z / billboard.min_height) * billboard.rect.h as f64).round() as i64;

    Ok(HorizontalQuad {
        rect,
        offset_center_x,
        offset_center_y,
        quad_width,
        elevation,
        psi_rotation: yaw_degrees.round(),
    })
}
