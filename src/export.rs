/// Run orchestration: root discovery, per-root collection and file writing.
///
/// One invocation walks every exportable root in the scene, builds its
/// forest document, and writes one .for file per root that collected
/// cleanly. A document with any logged error is never written; sibling
/// roots still get their chance.
use std::fs;
use std::path::{Path, PathBuf};

use crate::diagnostics::{Diagnostics, MessageCode};
use crate::forest::ForestFile;
use crate::scene::Scene;
use crate::texture::TextureLookup;

/// Error types for export operations.
#[derive(Debug)]
pub enum ExportError {
    /// A root produced zero valid trees.
    NoTrees(String),
    IoError(std::io::Error),
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::IoError(err)
    }
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportError::NoTrees(root) => {
                write!(f, "no valid trees under root '{}'", root)
            }
            ExportError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for ExportError {}

/// Aggregate result of one export run, reported back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// No exportable roots were found in the scene.
    CancelledNoRoots,
    /// At least one error was logged; every affected document was withheld.
    CancelledErrors,
    /// Every document written, zero errors logged.
    Finished,
}

/// Per-run switches, mirroring the operator options of the authoring tool.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Where .for files land; the scene file's directory when None.
    pub output_dir: Option<PathBuf>,
    /// Collect and diagnose but write nothing.
    pub dry_run: bool,
    /// Echo each assembled document to stdout between --- markers.
    pub print: bool,
}

/// Export every exportable root of the scene.
///
/// `scene_dir` anchors relative output paths (the scene file's own
/// directory). All diagnostics land in `diag`; the returned status is the
/// single aggregate answer for the host.
pub fn run(
    scene: &Scene,
    scene_dir: &Path,
    options: &RunOptions,
    textures: &dyn TextureLookup,
    diag: &mut Diagnostics,
) -> RunStatus {
    let roots = scene.exportable_roots();
    if roots.is_empty() {
        diag.error(
            MessageCode::E010,
            "could not find any root forests, use two layers of collections: \
             roots holding layer groups holding trees",
            None,
        );
        return RunStatus::CancelledNoRoots;
    }

    let output_dir = options
        .output_dir
        .clone()
        .unwrap_or_else(|| scene_dir.to_path_buf());

    for root in roots {
        let errors_before = diag.error_count();
        let forest = match ForestFile::collect(root, scene, textures, diag) {
            Ok(forest) => forest,
            Err(_) => continue,
        };

        let document = forest.write();
        if options.print {
            println!("---\n{}\n---", document);
        }

        // A document that logged errors during collection is withheld;
        // partial output is never persisted.
        if diag.error_count() > errors_before {
            continue;
        }

        let final_path = output_dir.join(ensure_for_ext(&forest.file_name));
        if options.dry_run {
            diag.info(
                MessageCode::I000,
                format!("not writing '{}' due to dry run", final_path.display()),
                None,
            );
            continue;
        }
        if let Err(problem) = write_document(&final_path, &document) {
            diag.error(
                MessageCode::E009,
                format!("could not write '{}': {}", final_path.display(), problem),
                Some(root.name.as_str()),
            );
        } else {
            println!("Wrote {}", final_path.display());
        }
    }

    if diag.error_count() > 0 {
        RunStatus::CancelledErrors
    } else {
        diag.success(MessageCode::S000, "Export finished without errors", None);
        RunStatus::Finished
    }
}

/// Create parent directories idempotently, then write in one shot.
fn write_document(path: &Path, document: &str) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, document)?;
    Ok(())
}

/// Append the .for extension unless the name already carries it.
fn ensure_for_ext(file_name: &str) -> String {
    if file_name.ends_with(".for") {
        file_name.to_string()
    } else {
        format!("{}.for", file_name)
    }
}
