//! MESH table emission and MESH_3D references in full documents.
mod common;

use common::*;
use xplane_for_export::diagnostics::Diagnostics;
use xplane_for_export::forest::ForestFile;
use xplane_for_export::scene::Scene;

fn document(scene: &Scene) -> String {
    let mut diag = Diagnostics::new();
    let forest = ForestFile::collect(&scene.roots[0], scene, &textures(), &mut diag).unwrap();
    assert_eq!(
        diag.error_count(),
        0,
        "unexpected errors: {:?}",
        diag.errors()
    );
    forest.write()
}

#[test]
fn complex_child_emits_one_table_and_a_reference() {
    let document = document(&scene(vec![root(
        "detailed",
        vec![group(
            "0 Conifers",
            vec![tree(
                "pine",
                1,
                vec![
                    vertical_quad("billboard", 1.0, 2.0),
                    complex_object("trunk", "trunk_mesh"),
                ],
            )],
        )],
    )]));

    // Two flat-shaded triangles over four corners: 4 vertices, 6 indices.
    assert_eq!(
        lines_with(&document, "MESH"),
        vec!["MESH\ttrunk_mesh\t0\t500\t4\t6"]
    );
    assert_eq!(document.lines().filter(|l| l.starts_with("VERTEX")).count(), 4);
    assert_eq!(
        lines_with(&document, "MESH_3D"),
        vec!["MESH_3D\ttrunk_mesh"]
    );
}

#[test]
fn shader_3d_block_appears_with_complex_objects() {
    let document = document(&scene(vec![root(
        "detailed",
        vec![group(
            "0 Conifers",
            vec![tree(
                "pine",
                1,
                vec![
                    vertical_quad("billboard", 1.0, 2.0),
                    complex_object("trunk", "trunk_mesh"),
                ],
            )],
        )],
    )]));
    assert!(document.contains("SHADER_3D\n\tTEXTURE trees/bark.png"));
}

#[test]
fn shared_meshes_emit_one_table_but_every_reference() {
    let document = document(&scene(vec![root(
        "orchard",
        vec![group(
            "0 Apples",
            vec![
                tree(
                    "apple a",
                    1,
                    vec![
                        vertical_quad("billboard a", 1.0, 2.0),
                        complex_object("trunk a", "apple_trunk"),
                    ],
                ),
                tree(
                    "apple b",
                    1,
                    vec![
                        vertical_quad("billboard b", 1.0, 2.0),
                        complex_object("trunk b", "apple_trunk"),
                    ],
                ),
            ],
        )],
    )]));

    assert_eq!(lines_with(&document, "MESH").len(), 1);
    assert_eq!(lines_with(&document, "MESH_3D").len(), 2);
}

#[test]
fn tables_are_sorted_by_mesh_name() {
    let document = document(&scene(vec![root(
        "mixed",
        vec![group(
            "0 Layer",
            vec![
                tree(
                    "tree one",
                    1,
                    vec![
                        vertical_quad("billboard one", 1.0, 2.0),
                        complex_object("trunk one", "willow_trunk"),
                    ],
                ),
                tree(
                    "tree two",
                    1,
                    vec![
                        vertical_quad("billboard two", 1.0, 2.0),
                        complex_object("trunk two", "aspen_trunk"),
                    ],
                ),
            ],
        )],
    )]));

    let names: Vec<&str> = lines_with(&document, "MESH")
        .iter()
        .map(|line| line.split('\t').nth(1).unwrap())
        .collect();
    assert_eq!(names, vec!["aspen_trunk", "willow_trunk"]);
}

#[test]
fn custom_lod_lands_on_the_reference_line() {
    let mut custom = tree(
        "pine",
        1,
        vec![
            vertical_quad("billboard", 1.0, 2.0),
            complex_object("trunk", "trunk_mesh"),
        ],
    );
    custom.settings.use_custom_lod = true;
    custom.settings.custom_lod = 3000;
    let document = document(&scene(vec![root(
        "detailed",
        vec![group("0 Conifers", vec![custom])],
    )]));

    assert_eq!(
        lines_with(&document, "MESH_3D"),
        vec!["MESH_3D\ttrunk_mesh\t3000"]
    );
}

#[test]
fn no_shadow_meshes_mark_their_table() {
    let mut shadowless = complex_object("trunk", "trunk_mesh");
    shadowless.settings.no_shadow = true;
    let document = document(&scene(vec![root(
        "detailed",
        vec![group(
            "0 Conifers",
            vec![tree(
                "pine",
                1,
                vec![vertical_quad("billboard", 1.0, 2.0), shadowless],
            )],
        )],
    )]));

    let mesh_line_index = document
        .lines()
        .position(|line| line.starts_with("MESH\t"))
        .unwrap();
    let following: Vec<&str> = document.lines().skip(mesh_line_index + 1).take(1).collect();
    assert_eq!(following, vec!["NO_SHADOW"]);
}

#[test]
fn vertex_lines_use_the_xplane_axis_convention() {
    let document = document(&scene(vec![root(
        "detailed",
        vec![group(
            "0 Conifers",
            vec![tree(
                "pine",
                1,
                vec![
                    vertical_quad("billboard", 1.0, 2.0),
                    complex_object("trunk", "trunk_mesh"),
                ],
            )],
        )],
    )]));

    // The authoring-space corner (1, 0, 3) lands at (1, 3, 0); its flat
    // normal (0, -1, 0) becomes (0, 0, 1).
    assert!(document.contains("VERTEX\t1 3 0\t0 0 1\t0\t0\t0 0 0"));
}
