//! Post-parse compatibility checks for template file trees.
//!
//! The parser no longer tells `$`-prefixed variable references apart from
//! bare global names. [`check_file`] runs global resolution followed by the
//! restoration pass, which rewrites global call targets into template
//! literals and reports the checks the parser used to enforce.
//!
//! ```
//! use template_compat_core::{check_file, CheckOptions, TemplateFile};
//!
//! let mut file: TemplateFile = serde_json::from_value(serde_json::json!({
//!     "file_path": "a.tmpl",
//!     "namespace": "ns",
//!     "templates": []
//! })).unwrap();
//! let report = check_file(&mut file, &CheckOptions::default()).unwrap();
//! assert!(report.is_clean());
//! ```

pub mod ast;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod passes;
pub mod source;

use serde::{Deserialize, Serialize};

pub use ast::{IdGenerator, TemplateFile};
pub use config::CheckOptions;
pub use diagnostics::{Diagnostic, DiagnosticCollector, DiagnosticKind, ErrorReporter};
pub use error::{CompileError, ErrorCode};
pub use passes::{FilePass, PassManager, ResolveGlobalsPass, RestoreCompilerChecksPass};
pub use source::{Identifier, Point, SourceLocation};

/// Outcome of checking one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Every diagnostic, in report order.
    pub diagnostics: Vec<Diagnostic>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// The default schedule for `options`.
pub fn default_pipeline(options: &CheckOptions) -> PassManager {
    let manager = PassManager::new();
    let manager = if options.resolve_globals {
        manager.add(ResolveGlobalsPass)
    } else {
        manager.assume_ran(passes::p0_resolve_globals::NAME)
    };
    manager.add(RestoreCompilerChecksPass)
}

/// Run the default pipeline on one file tree, rewriting it in place.
///
/// Fails only when the tree is rejected before any pass runs; problems in the
/// template source come back as diagnostics in the report.
pub fn check_file(
    file: &mut TemplateFile,
    options: &CheckOptions,
) -> Result<CheckReport, CompileError> {
    let depth = ast::tree_depth(file);
    if depth > options.max_depth {
        tracing::warn!(
            file = %file.file_path,
            depth,
            max_depth = options.max_depth,
            "tree too deep"
        );
        return Err(CompileError::DepthExceeded {
            path: file.file_path.clone(),
            depth,
            max_depth: options.max_depth,
        });
    }

    let mut id_gen = IdGenerator::after(file);
    let mut collector = DiagnosticCollector::new();
    default_pipeline(options).run_file(file, &mut id_gen, &mut collector)?;

    Ok(CheckReport {
        diagnostics: collector.into_diagnostics(),
    })
}
