/// X-Plane forest (.for) layout engine.
///
/// Turns a snapshot of authored scene geometry into forestry placement
/// files: billboard quads become TREE sprite records, canopy quads become
/// Y_QUAD records, complex meshes become deduplicated MESH tables, and
/// layer groups become frequency-normalized distribution layers.
pub mod billboard;
pub mod classify;
pub mod constants;
pub mod coordinates;
pub mod diagnostics;
pub mod export;
pub mod forest;
pub mod format;
pub mod header;
pub mod horizontal;
pub mod mesh_table;
pub mod scene;
pub mod settings;
pub mod texture;
pub mod tree;

pub use diagnostics::Diagnostics;
pub use export::{RunOptions, RunStatus, run};
pub use scene::Scene;
pub use texture::{FileTextures, StaticTextures, TextureLookup};
