use std::fs;
use std::path::Path;

use anyhow::Context;

/// Overwrite `path` with a rendered block
///
/// Parent directories are created as needed. There is no backup and no
/// atomic rename: the previous block is simply replaced.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file cannot be written.
pub fn write_block(path: &Path, contents: &str) -> anyhow::Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory for {}", path.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    println!("✅ Generated {}", path.display());
    Ok(contents.len())
}
