//! Local variable definitions introduced by binding constructs.

use serde::{Deserialize, Serialize};

use crate::source::SourceLocation;

/// Sigil that prefixes every locally bound variable name.
pub const SIGIL: char = '$';

/// A local variable introduced by `let`, a loop, or a list comprehension.
///
/// `original_name` keeps the name exactly as the author wrote it, sigil
/// included (or missing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalVarDefn {
    pub original_name: String,
    pub name_location: SourceLocation,
}

impl LocalVarDefn {
    pub fn new(original_name: impl Into<String>, name_location: SourceLocation) -> Self {
        Self {
            original_name: original_name.into(),
            name_location,
        }
    }

    pub fn has_sigil(&self) -> bool {
        self.original_name.starts_with(SIGIL)
    }
}
