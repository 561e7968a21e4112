/// Shared configuration for forest file generation

/// Significant digits before a float is written to a .for file
pub const PRECISION_FOR_FLOAT: usize = 8;

/// Decimal places used when comparing world-space geometry
pub const PRECISION_GEOMETRY: u32 = 5;

/// Matching absolute tolerance for world-space lengths and heights
pub const GEOMETRY_TOLERANCE: f64 = 1e-5;

/// Indices grouped per IDX line in mesh tables
pub const INDICES_PER_LINE: usize = 10;
