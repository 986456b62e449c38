//! Compiler passes over a single file tree.
//!
//! Each pass is a self-contained transformation or validation. Passes run in
//! the order they were added to a [`PassManager`]; a pass names the passes it
//! must follow through [`FilePass::run_after`], and the manager refuses to run
//! a schedule that breaks those constraints.

pub mod p0_resolve_globals;
pub mod p1_restore_checks;

use crate::ast::{IdGenerator, TemplateFile};
use crate::diagnostics::ErrorReporter;
use crate::error::CompileError;

pub use p0_resolve_globals::ResolveGlobalsPass;
pub use p1_restore_checks::RestoreCompilerChecksPass;

/// A pass that runs once per file.
pub trait FilePass {
    /// Stable pass name used in scheduling constraints and logs.
    fn name(&self) -> &'static str;

    /// Names of passes that must have run on the file before this one.
    fn run_after(&self) -> &'static [&'static str] {
        &[]
    }

    fn run(
        &self,
        file: &mut TemplateFile,
        id_gen: &mut IdGenerator,
        reporter: &mut dyn ErrorReporter,
    );
}

/// Ordered list of file passes.
#[derive(Default)]
pub struct PassManager {
    passes: Vec<Box<dyn FilePass>>,
    assumed: Vec<&'static str>,
}

impl PassManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pass to the schedule.
    pub fn add(mut self, pass: impl FilePass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Record that `name` already ran on every file before this manager sees it.
    pub fn assume_ran(mut self, name: &'static str) -> Self {
        self.assumed.push(name);
        self
    }

    pub fn pass_names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Check every `run_after` constraint against the schedule order.
    pub fn validate(&self) -> Result<(), CompileError> {
        let mut ran: Vec<&'static str> = self.assumed.clone();
        for pass in &self.passes {
            if let Some(missing) = pass
                .run_after()
                .iter()
                .copied()
                .find(|dep| !ran.contains(dep))
            {
                return Err(CompileError::PassOrdering {
                    pass: pass.name(),
                    requires: missing,
                });
            }
            ran.push(pass.name());
        }
        Ok(())
    }

    /// Run every pass, in order, on one file.
    pub fn run_file(
        &self,
        file: &mut TemplateFile,
        id_gen: &mut IdGenerator,
        reporter: &mut dyn ErrorReporter,
    ) -> Result<(), CompileError> {
        self.validate()?;
        for pass in &self.passes {
            tracing::debug!(pass = pass.name(), file = %file.file_path, "running pass");
            pass.run(file, id_gen, reporter);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticCollector;

    fn empty_file() -> TemplateFile {
        TemplateFile {
            file_path: "empty.tmpl".to_string(),
            namespace: "ns".to_string(),
            templates: vec![],
        }
    }

    #[test]
    fn test_restore_checks_requires_resolve_globals() {
        let manager = PassManager::new().add(RestoreCompilerChecksPass);
        let err = manager.validate().unwrap_err();
        assert!(matches!(
            err,
            CompileError::PassOrdering {
                pass: "restore-compiler-checks",
                requires: "resolve-globals"
            }
        ));
    }

    #[test]
    fn test_wrong_order_is_rejected() {
        let manager = PassManager::new()
            .add(RestoreCompilerChecksPass)
            .add(ResolveGlobalsPass);
        let mut collector = DiagnosticCollector::new();
        let result =
            manager.run_file(&mut empty_file(), &mut IdGenerator::new(), &mut collector);
        assert!(result.is_err());
    }

    #[test]
    fn test_default_order_is_accepted() {
        let manager = PassManager::new()
            .add(ResolveGlobalsPass)
            .add(RestoreCompilerChecksPass);
        assert_eq!(
            manager.pass_names(),
            vec!["resolve-globals", "restore-compiler-checks"]
        );
        let mut collector = DiagnosticCollector::new();
        manager
            .run_file(&mut empty_file(), &mut IdGenerator::new(), &mut collector)
            .unwrap();
        assert_eq!(collector.error_count(), 0);
    }

    #[test]
    fn test_assumed_prerequisite_satisfies_constraint() {
        let manager = PassManager::new()
            .assume_ran(p0_resolve_globals::NAME)
            .add(RestoreCompilerChecksPass);
        assert!(manager.validate().is_ok());
    }
}
