//! Locating the runtime data directory.
//!
//! The binary may run from the workspace root, the engine crate, or next to an
//! installed executable; the first existing candidate wins.

use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Layouts searched under each base directory, most specific first.
const LAYOUTS: [&str; 2] = ["chronicles_engine/data", "data"];

static DATA_ROOT: LazyLock<PathBuf> = LazyLock::new(|| {
    let bases = search_bases();
    find_data_root(&bases).unwrap_or_else(|| PathBuf::from("data"))
});

/// The detected data directory.
pub fn data_root() -> &'static Path {
    &DATA_ROOT
}

/// The working directory, then the executable's directory and its parent.
fn search_bases() -> Vec<PathBuf> {
    let mut bases = vec![PathBuf::new()];
    if let Ok(exe) = env::current_exe()
        && let Some(dir) = exe.parent()
    {
        bases.push(dir.to_path_buf());
        bases.extend(dir.parent().map(Path::to_path_buf));
    }
    bases
}

fn find_data_root(bases: &[PathBuf]) -> Option<PathBuf> {
    bases
        .iter()
        .flat_map(|base| LAYOUTS.iter().map(move |layout| base.join(layout)))
        .find(|candidate| candidate.is_dir())
}
