//! Scene construction helpers shared by the integration tests.
//!
//! Builders assemble the same shapes an author would model: grounded
//! billboard quads with atlas UVs, flat canopy quads, and small 3D trunk
//! meshes, wrapped in containers, layer groups and root collections.
#![allow(dead_code)]
use glam::{DVec2, DVec3};
use std::collections::BTreeMap;

use xplane_for_export::scene::{
    LayerGroup, MeshData, MeshVertex, Polygon, RootCollection, Scene, SceneObject, Transform,
    TreeContainer,
};
use xplane_for_export::settings::{CollectionSettings, MaterialSettings, TreeSettings};
use xplane_for_export::texture::StaticTextures;

pub const ATLAS_PATH: &str = "trees/atlas.png";
pub const ATLAS_MATERIAL: &str = "atlas";
pub const BARK_MATERIAL: &str = "bark";

/// Lookup serving the 512x256 test atlas for both materials.
pub fn textures() -> StaticTextures {
    let mut lookup = StaticTextures::new();
    lookup.insert(ATLAS_PATH, 512, 256);
    lookup.insert("trees/bark.png", 1024, 1024);
    lookup
}

fn quad_mesh(name: &str, positions: [[f64; 3]; 4], uvs: [[f64; 2]; 4]) -> MeshData {
    MeshData {
        name: name.to_string(),
        vertices: positions
            .iter()
            .map(|p| MeshVertex {
                position: DVec3::from_array(*p),
                weights: Vec::new(),
            })
            .collect(),
        edges: vec![[0, 1], [1, 2], [2, 3], [3, 0]],
        polygons: vec![Polygon {
            vertices: vec![0, 1, 2, 3],
            normal: DVec3::NEG_Y,
            smooth: false,
            split_normals: None,
        }],
        uv: Some(uvs.iter().map(|uv| DVec2::from_array(*uv)).collect()),
        vertex_groups: Vec::new(),
    }
}

/// A billboard standing on the ground in the XZ plane, mapped to the
/// atlas rect (0,0)-(0.5,0.25): 256x64 pixels of the 512x256 atlas.
pub fn vertical_quad(name: &str, width: f64, height: f64) -> SceneObject {
    SceneObject {
        name: name.to_string(),
        transform: Transform::default(),
        mesh: quad_mesh(
            name,
            [
                [0.0, 0.0, 0.0],
                [width, 0.0, 0.0],
                [width, 0.0, height],
                [0.0, 0.0, height],
            ],
            [[0.0, 0.0], [0.5, 0.0], [0.5, 0.25], [0.0, 0.25]],
        ),
        material: Some(ATLAS_MATERIAL.to_string()),
        settings: Default::default(),
    }
}

/// A second billboard crossing the first at a right angle.
pub fn crossing_quad(name: &str, width: f64, height: f64) -> SceneObject {
    let half = width / 2.0;
    SceneObject {
        name: name.to_string(),
        transform: Transform::default(),
        mesh: quad_mesh(
            name,
            [
                [half, -half, 0.0],
                [half, half, 0.0],
                [half, half, height],
                [half, -half, height],
            ],
            [[0.0, 0.0], [0.5, 0.0], [0.5, 0.25], [0.0, 0.25]],
        ),
        material: Some(ATLAS_MATERIAL.to_string()),
        settings: Default::default(),
    }
}

/// A flat canopy quad centered on its pivot, raised to the given elevation
/// through its object transform, mapped to the atlas rect (0.5,0.25)-(1,0.5).
pub fn horizontal_quad(name: &str, size: f64, elevation: f64) -> SceneObject {
    let half = size / 2.0;
    SceneObject {
        name: name.to_string(),
        transform: Transform {
            translation: DVec3::new(0.0, 0.0, elevation),
            ..Transform::default()
        },
        mesh: quad_mesh(
            name,
            [
                [-half, -half, 0.0],
                [half, -half, 0.0],
                [half, half, 0.0],
                [-half, half, 0.0],
            ],
            [[0.5, 0.25], [1.0, 0.25], [1.0, 0.5], [0.5, 0.5]],
        ),
        material: Some(ATLAS_MATERIAL.to_string()),
        settings: Default::default(),
    }
}

/// A two-triangle 3D mesh, enough edges to classify as a complex object.
pub fn complex_object(name: &str, mesh_name: &str) -> SceneObject {
    let positions = [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 0.0, 3.0],
        [0.0, 0.0, 3.0],
    ];
    SceneObject {
        name: name.to_string(),
        transform: Transform::default(),
        mesh: MeshData {
            name: mesh_name.to_string(),
            vertices: positions
                .iter()
                .map(|p| MeshVertex {
                    position: DVec3::from_array(*p),
                    weights: Vec::new(),
                })
                .collect(),
            edges: vec![[0, 1], [1, 2], [2, 0], [2, 3], [3, 0]],
            polygons: vec![
                Polygon {
                    vertices: vec![0, 1, 2],
                    normal: DVec3::NEG_Y,
                    smooth: false,
                    split_normals: None,
                },
                Polygon {
                    vertices: vec![0, 2, 3],
                    normal: DVec3::NEG_Y,
                    smooth: false,
                    split_normals: None,
                },
            ],
            uv: None,
            vertex_groups: Vec::new(),
        },
        material: Some(BARK_MATERIAL.to_string()),
        settings: Default::default(),
    }
}

pub fn tree(name: &str, weighted_importance: u32, children: Vec<SceneObject>) -> TreeContainer {
    TreeContainer {
        name: name.to_string(),
        visible: true,
        transform: Transform::default(),
        settings: TreeSettings {
            weighted_importance,
            ..TreeSettings::default()
        },
        children,
    }
}

pub fn group(name: &str, containers: Vec<TreeContainer>) -> LayerGroup {
    LayerGroup {
        name: name.to_string(),
        containers,
    }
}

pub fn root(name: &str, groups: Vec<LayerGroup>) -> RootCollection {
    RootCollection {
        name: name.to_string(),
        exportable: true,
        visible: true,
        settings: CollectionSettings::default(),
        groups,
    }
}

/// Scene carrying the billboard atlas material and a 3D bark material.
pub fn scene(roots: Vec<RootCollection>) -> Scene {
    let mut materials = BTreeMap::new();
    materials.insert(
        ATLAS_MATERIAL.to_string(),
        MaterialSettings {
            texture_path: ATLAS_PATH.to_string(),
            ..MaterialSettings::default()
        },
    );
    materials.insert(
        BARK_MATERIAL.to_string(),
        MaterialSettings {
            texture_path: "trees/bark.png".to_string(),
            ..MaterialSettings::default()
        },
    );
    Scene { roots, materials }
}

/// Lines of the document whose first tab-separated field is `keyword`,
/// leading indentation ignored.
pub fn lines_with<'a>(document: &'a str, keyword: &str) -> Vec<&'a str> {
    document
        .lines()
        .filter(|line| {
            line.trim_start()
                .split('\t')
                .next()
                .map(|first| first.split(' ').next() == Some(keyword))
                .unwrap_or(false)
        })
        .collect()
}
