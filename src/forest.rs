/// Forest document collection and assembly for one exportable root.
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

use crate::diagnostics::{Diagnostics, MessageCode};
use crate::export::ExportError;
use crate::format::{float_to_str, round_to};
use crate::header::Header;
use crate::mesh_table::{self, MeshTable};
use crate::scene::{RootCollection, Scene};
use crate::settings::{CollectionSettings, SurfaceType};
use crate::texture::TextureLookup;
use crate::tree::ForestTree;

/// One root collection resolved into trees, mesh tables and header state.
pub struct ForestFile {
    pub file_name: String,
    settings: CollectionSettings,
    header: Header,
    /// Trees per layer number; BTreeMap iteration gives ascending layers.
    layers: BTreeMap<u32, Vec<ForestTree>>,
    mesh_tables: Vec<MeshTable>,
}

impl ForestFile {
    /// Walk a root's layer groups and build the document state.
    ///
    /// Individual tree and group failures are logged and excluded; a root
    /// that produces no trees at all is fatal for this document.
    pub fn collect(
        root: &RootCollection,
        scene: &Scene,
        textures: &dyn TextureLookup,
        diag: &mut Diagnostics,
    ) -> Result<ForestFile, ExportError> {
        let settings = root.settings.clone();
        if let Err(problem) = settings.validate() {
            diag.error(MessageCode::E013, problem, Some(root.name.as_str()));
        }

        let container_count: usize = root.groups.iter().map(|g| g.containers.len()).sum();
        let pb = ProgressBar::new(container_count as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{bar:40.green/blue}] {pos}/{len} trees ({percent}%) {msg}")
                .unwrap()
                .progress_chars("█▉▊▋▌▍▎▏"),
        );
        pb.set_message(format!("Collecting {}", root.name));

        let mut layers: BTreeMap<u32, Vec<ForestTree>> = BTreeMap::new();
        for group in &root.groups {
            let Some(layer_number) = parse_layer_number(&group.name) else {
                diag.error(
                    MessageCode::E004,
                    "layer group names start with a whole number, like '0 Conifers'",
                    Some(group.name.as_str()),
                );
                pb.inc(group.containers.len() as u64);
                continue;
            };

            for container in &group.containers {
                pb.inc(1);
                // Qualifying containers are visible and carry mesh children.
                if !container.visible || container.children.is_empty() {
                    continue;
                }
                if let Some(tree) =
                    ForestTree::build(container, layer_number, scene, textures, diag)
                {
                    layers.entry(layer_number).or_default().push(tree);
                }
            }
        }
        pb.finish_with_message("Trees collected");

        if layers.values().all(Vec::is_empty) || layers.is_empty() {
            diag.error(
                MessageCode::E006,
                "no valid trees found under this root",
                Some(root.name.as_str()),
            );
            return Err(ExportError::NoTrees(root.name.clone()));
        }

        for trees in layers.values_mut() {
            normalize_frequencies(trees);
        }

        if settings.perlin_choice.is_some() {
            let layer_numbers: Vec<u32> = layers.keys().copied().collect();
            check_group_percentages(&settings, &layer_numbers, &root.name, diag);
        }

        let all_trees: Vec<&ForestTree> = layers.values().flatten().collect();
        let mesh_tables = collect_mesh_tables(&all_trees);
        let trees_flat: Vec<ForestTree> = all_trees.iter().map(|t| (*t).clone()).collect();
        let header = Header::collect(&root.name, &trees_flat, scene, diag);

        let file_name = if settings.file_name.is_empty() {
            root.name.clone()
        } else {
            settings.file_name.clone()
        };

        Ok(ForestFile {
            file_name,
            settings,
            header,
            layers,
            mesh_tables,
        })
    }

    /// Assemble the final document text.
    pub fn write(&self) -> String {
        let mut o = self.header.write(&self.settings);

        for table in &self.mesh_tables {
            o.push('\n');
            o.push_str(&table.write());
        }

        let group_wrapped = self.settings.perlin_choice.is_some();
        o.push('\n');
        for (layer_number, trees) in &self.layers {
            if group_wrapped {
                let percentage = self
                    .settings
                    .group_percentages
                    .as_ref()
                    .and_then(|map| map.get(layer_number))
                    .copied()
                    .unwrap_or(0.0);
                o.push_str(&format!(
                    "GROUP\t{}\t{}\n",
                    layer_number,
                    float_to_str(percentage)
                ));
                for tree in trees {
                    for line in tree.write_lines() {
                        o.push('\t');
                        o.push_str(&line);
                        o.push('\n');
                    }
                }
            } else {
                for tree in trees {
                    for line in tree.write_lines() {
                        o.push_str(&line);
                        o.push('\n');
                    }
                }
            }
        }

        let skip_lines: Vec<String> = SurfaceType::ALL
            .iter()
            .filter(|surface| self.settings.skip_surfaces.contains(surface))
            .map(|surface| format!("SKIP_SURFACE {}", surface.keyword()))
            .collect();
        if !skip_lines.is_empty() {
            o.push('\n');
            o.push_str(&skip_lines.join("\n"));
            o.push('\n');
        }

        o
    }
}

/// The whole number prefix of a layer group name ("2 Conifers" -> 2).
pub fn parse_layer_number(name: &str) -> Option<u32> {
    let digits: String = name
        .trim_start()
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Turn weighted importances into percentages summing to exactly 100.
///
/// Each tree gets its weight share rounded to whole percent precision; the
/// rounding residual lands on the first tree in layer order.
pub fn normalize_frequencies(trees: &mut [ForestTree]) {
    let total: u64 = trees
        .iter()
        .map(|tree| tree.weighted_importance as u64)
        .sum();
    if total == 0 {
        return;
    }
    for tree in trees.iter_mut() {
        let share = tree.weighted_importance as f64 / total as f64;
        tree.freq = round_to(share, 2) * 100.0;
    }
    let sum: f64 = trees.iter().map(|tree| tree.freq).sum();
    if let Some(first) = trees.first_mut() {
        first.freq += 100.0 - sum;
    }
}

/// Percentages must cover every collected layer and sum to 100, checked at
/// whole-percent precision. Violations are document errors, not crashes.
fn check_group_percentages(
    settings: &CollectionSettings,
    layer_numbers: &[u32],
    root_name: &str,
    diag: &mut Diagnostics,
) {
    let subject = Some(root_name);
    let Some(percentages) = &settings.group_percentages else {
        diag.error(
            MessageCode::E005,
            "perlin choice needs a group percentage for every layer",
            subject,
        );
        return;
    };
    for layer in layer_numbers {
        if !percentages.contains_key(layer) {
            diag.error(
                MessageCode::E005,
                format!("layer {} has no group percentage", layer),
                subject,
            );
        }
    }
    let sum: f64 = percentages.values().sum();
    if sum.round() != 100.0 {
        diag.error(
            MessageCode::E005,
            format!("group percentages sum to {}, expected 100", float_to_str(sum)),
            subject,
        );
    }
}

/// One table per distinct mesh referenced by any tree, sorted by name.
fn collect_mesh_tables(trees: &[&ForestTree]) -> Vec<MeshTable> {
    let mut tables: Vec<MeshTable> = Vec::new();
    for tree in trees {
        for complex in &tree.complex_objects {
            if tables.iter().any(|table| table.name == complex.mesh.name) {
                continue;
            }
            tables.push(mesh_table::build(complex));
        }
    }
    tables.sort_by(|a, b| a.name.cmp(&b.name));
    tables
}
