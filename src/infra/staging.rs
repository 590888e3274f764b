//! Filesystem staging — copies a module tree into a temporary directory.
//!
//! The run never executes terraform against the source module tree: the
//! copy isolates parallel or repeated runs from each other and keeps
//! terraform's side effects (lock files, `.terraform/`) out of the
//! repository. Local state and provider caches are excluded from the copy
//! so nothing leaks from a previous run.

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::{ModuleStager, StagedModule};

/// Directories never copied into the staged tree.
const EXCLUDED_DIRS: &[&str] = &[".terraform", ".git"];

/// Production `ModuleStager` backed by `tempfile::TempDir`.
pub struct TempStager;

impl ModuleStager for TempStager {
    fn stage(&self, root: &Path, module_rel: &Path) -> Result<StagedModule> {
        let source = root.join(module_rel);
        anyhow::ensure!(
            source.is_dir(),
            "module directory {} does not exist",
            source.display()
        );

        let dir = tempfile::Builder::new()
            .prefix("tfcheck-")
            .tempdir()
            .context("creating staging directory")?;
        copy_tree(&source, dir.path())
            .with_context(|| format!("staging {}", source.display()))?;
        Ok(StagedModule::new(dir))
    }
}

/// Recursively copy `src` into `dst`, skipping excluded directories and
/// local state files.
fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    for entry in std::fs::read_dir(src).with_context(|| format!("reading {}", src.display()))? {
        let entry = entry.with_context(|| format!("reading {}", src.display()))?;
        let name = entry.file_name();
        let file_type = entry
            .file_type()
            .with_context(|| format!("stat {}", entry.path().display()))?;

        if file_type.is_dir() {
            if EXCLUDED_DIRS.iter().any(|d| name == *d) {
                continue;
            }
            let target = dst.join(&name);
            std::fs::create_dir(&target)
                .with_context(|| format!("creating {}", target.display()))?;
            copy_tree(&entry.path(), &target)?;
        } else if file_type.is_file() {
            if is_local_state(&name.to_string_lossy()) {
                continue;
            }
            let target = dst.join(&name);
            std::fs::copy(entry.path(), &target)
                .with_context(|| format!("copying {}", entry.path().display()))?;
        }
        // Symlinks are skipped: a module tree pointing outside itself
        // would escape the staging isolation.
    }
    Ok(())
}

/// Terraform's local state artifacts — never staged.
fn is_local_state(name: &str) -> bool {
    name.ends_with(".tfstate") || name.ends_with(".tfstate.backup")
}
