/// Forest exporter command line entry point
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use xplane_for_export::diagnostics::Diagnostics;
use xplane_for_export::export::{self, RunOptions, RunStatus};
use xplane_for_export::scene::Scene;
use xplane_for_export::texture::FileTextures;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut options = RunOptions::default();
    let mut positional: Vec<&String> = Vec::new();
    for arg in &args[1..] {
        match arg.as_str() {
            "--dry-run" => options.dry_run = true,
            "--print" => options.print = true,
            _ => positional.push(arg),
        }
    }

    if positional.is_empty() || positional.len() > 2 {
        eprintln!(
            "Usage: {} <scene.json> [output_dir] [--dry-run] [--print]",
            args[0]
        );
        std::process::exit(1);
    }

    let scene_path = PathBuf::from(positional[0]);
    options.output_dir = positional.get(1).map(PathBuf::from);

    let scene_text = fs::read_to_string(&scene_path)?;
    let scene: Scene = serde_json::from_str(&scene_text)?;
    let scene_dir = scene_path.parent().unwrap_or(Path::new(".")).to_path_buf();

    let textures = FileTextures::new(&scene_dir);
    let mut diag = Diagnostics::with_console_echo();
    let status = export::run(&scene, &scene_dir, &options, &textures, &mut diag);

    match status {
        RunStatus::Finished => Ok(()),
        RunStatus::CancelledNoRoots | RunStatus::CancelledErrors => {
            eprintln!("Export cancelled, {} error(s) logged", diag.error_count());
            std::process::exit(1);
        }
    }
}
