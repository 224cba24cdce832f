use std::path::{Path, PathBuf};

use crate::application::{ApplicationError, ApplicationResult};

/// Expand `~` and `$VAR` in a user-supplied path.
pub fn expand_path(path: &Path) -> ApplicationResult<PathBuf> {
    let raw = path.to_string_lossy();
    shellexpand::full(&raw)
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .map_err(|e| ApplicationError::invalid_input(format!("cannot expand path '{}': {}", raw, e)))
}
