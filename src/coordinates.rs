use glam::DVec3;

/// Remap an authoring-space vector into the X-Plane axis convention.
/// Authoring Z-up becomes X-Plane Y-up: (x, y, z) -> (x, z, -y).
pub fn to_xplane(v: DVec3) -> DVec3 {
    DVec3::new(v.x, v.z, -v.y)
}

/// Inverse remap, from X-Plane axes back to authoring axes.
pub fn from_xplane(v: DVec3) -> DVec3 {
    DVec3::new(v.x, -v.z, v.y)
}
