//! Configuration for checking a file tree.

use serde::{Deserialize, Serialize};

/// Options for [`crate::check_file`].
///
/// ## Serialization Format
///
/// Fields are serialized in `kebab-case` (e.g., `resolve-globals`, `max-depth`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CheckOptions {
    /// Run global resolution before the restoration checks. Turn off only when
    /// the tree was already resolved upstream.
    pub resolve_globals: bool,
    /// Maximum statement/expression nesting accepted before any pass runs.
    ///
    /// Trees read with `serde_json` are already capped by its 128-level
    /// recursion limit, and one tree level costs two to four JSON levels, so
    /// the default stays low enough to be reachable from JSON input.
    pub max_depth: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            resolve_globals: true,
            max_depth: 48,
        }
    }
}
