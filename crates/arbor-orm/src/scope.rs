//! Named, optionally parameterized query scopes.

use std::fmt;
use std::sync::Arc;

use arbor_core::ScalarValue;

use crate::filter::Filter;

/// A scope body: either a fixed filter or a function of its arguments.
///
/// Both forms are attached to a model under a name and combined by name
/// at query time.
#[derive(Clone)]
pub enum Scope {
    /// A fixed filter.
    Static(Filter),
    /// A filter computed from call arguments.
    Dynamic(Arc<dyn Fn(&[ScalarValue]) -> Filter + Send + Sync>),
}

impl Scope {
    /// Wraps a parameterized scope function.
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&[ScalarValue]) -> Filter + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(f))
    }

    /// Statically known attribute references, for registration-time checks.
    ///
    /// Dynamic scopes yield nothing here; their output depends on call
    /// arguments and cannot be inspected until invoked.
    #[must_use]
    pub fn static_fields(&self) -> Vec<String> {
        match self {
            Self::Static(filter) => filter.fields(),
            Self::Dynamic(_) => Vec::new(),
        }
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(filter) => f.debug_tuple("Static").field(filter).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

/// A by-name scope invocation, optionally with arguments.
#[derive(Debug, Clone, Default)]
pub struct ScopeCall {
    /// Scope name.
    pub name: String,
    /// Arguments passed to a dynamic scope.
    pub args: Vec<ScalarValue>,
}

impl ScopeCall {
    /// Invocation with no arguments.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Adds call arguments.
    #[must_use]
    pub fn with_args(mut self, args: Vec<ScalarValue>) -> Self {
        self.args = args;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_fields() {
        let scope = Scope::Static(Filter::is_null("first_name"));
        assert_eq!(scope.static_fields(), vec!["first_name".to_string()]);
    }

    #[test]
    fn test_dynamic_fields_are_opaque() {
        let scope = Scope::dynamic(|args| Filter::eq("first_name", args[0].clone()));
        assert!(scope.static_fields().is_empty());
    }

    #[test]
    fn test_dynamic_resolution() {
        let scope = Scope::dynamic(|args| Filter::eq("first_name", args[0].clone()));
        let Scope::Dynamic(f) = &scope else {
            panic!("expected dynamic scope");
        };
        let filter = f(&[ScalarValue::Text("ada".to_string())]);
        assert_eq!(filter, Filter::eq("first_name", "ada"));
    }
}
