//! Ordered, name-addressable set of checks.

use crate::check::Check;
use crate::error::{CiError, Result};
use crate::report::CheckDescriptor;
use std::sync::Arc;

/// Checks registered at startup, in registration order.
#[derive(Default, Clone)]
pub struct CheckRegistry {
    checks: Vec<Arc<dyn Check>>,
}

/// Outcome of resolving requested names against a registry.
pub struct Resolution {
    /// Checks to execute, in execution order.
    pub checks: Vec<Arc<dyn Check>>,
    /// Requested names that matched nothing.
    pub unknown: Vec<String>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a check. Names are unique ignoring ASCII case.
    pub fn register(&mut self, check: Arc<dyn Check>) -> Result<()> {
        if self.find(check.name()).is_some() {
            return Err(CiError::UserError(format!(
                "check '{}' is already registered",
                check.name()
            )));
        }
        self.checks.push(check);
        Ok(())
    }

    pub fn with(mut self, check: Arc<dyn Check>) -> Result<Self> {
        self.register(check)?;
        Ok(self)
    }

    /// Case-insensitive lookup.
    pub fn find(&self, name: &str) -> Option<&Arc<dyn Check>> {
        let name = name.trim();
        self.checks
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }

    pub fn names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    pub fn descriptors(&self) -> Vec<CheckDescriptor> {
        self.checks
            .iter()
            .map(|c| CheckDescriptor {
                name: c.name().to_string(),
                description: c.description().to_string(),
            })
            .collect()
    }

    /// Resolve requested names into the checks to execute.
    ///
    /// An empty request (after dropping blank names) selects every check in
    /// registry order. Otherwise checks run in request order; a check named
    /// more than once runs once.
    pub fn resolve<S: AsRef<str>>(&self, requested: &[S]) -> Resolution {
        let requested: Vec<&str> = requested
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty())
            .collect();

        if requested.is_empty() {
            return Resolution {
                checks: self.checks.clone(),
                unknown: Vec::new(),
            };
        }

        let mut checks: Vec<Arc<dyn Check>> = Vec::new();
        let mut unknown = Vec::new();

        for name in requested {
            match self.find(name) {
                Some(check) => {
                    if !checks.iter().any(|c| Arc::ptr_eq(c, check)) {
                        checks.push(Arc::clone(check));
                    }
                }
                None => unknown.push(name.to_string()),
            }
        }

        Resolution { checks, unknown }
    }
}
