//! Composable filter expressions.
//!
//! Filters are description values: they name attributes and operands but
//! generate no SQL. Scopes resolve to filters, and the registry validates
//! the attributes a filter references against the owning model's schema.

use arbor_core::{ScalarValue, ToScalarValue};

/// A filter expression over model attributes.
///
/// # Example
///
/// ```
/// use arbor_orm::Filter;
///
/// let f = Filter::eq("status", "active")
///     .and(Filter::gt("age", 18).or(Filter::eq("verified", true)));
/// assert!(f.fields().contains(&"age".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    expr: FilterExpr,
}

/// Internal filter expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterExpr {
    /// Comparison of an attribute against a value.
    Comparison {
        /// Attribute name.
        field: String,
        /// Comparison operator.
        op: CompareOp,
        /// Right-hand operand.
        value: ScalarValue,
    },
    /// Attribute IS NULL.
    IsNull {
        /// Attribute name.
        field: String,
    },
    /// Attribute IS NOT NULL.
    IsNotNull {
        /// Attribute name.
        field: String,
    },
    /// Attribute is one of the listed values.
    InList {
        /// Attribute name.
        field: String,
        /// Candidate values.
        values: Vec<ScalarValue>,
    },
    /// Attribute matches a pattern (`%` wildcards).
    Like {
        /// Attribute name.
        field: String,
        /// Match pattern.
        pattern: String,
    },
    /// Attribute lies in an inclusive range.
    Between {
        /// Attribute name.
        field: String,
        /// Lower bound.
        low: ScalarValue,
        /// Upper bound.
        high: ScalarValue,
    },
    /// Conjunction.
    And(Box<FilterExpr>, Box<FilterExpr>),
    /// Disjunction.
    Or(Box<FilterExpr>, Box<FilterExpr>),
    /// Negation.
    Not(Box<FilterExpr>),
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Equal.
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
}

impl Filter {
    fn comparison<V: ToScalarValue>(field: &str, op: CompareOp, value: V) -> Self {
        Self {
            expr: FilterExpr::Comparison {
                field: field.to_string(),
                op,
                value: value.to_scalar_value(),
            },
        }
    }

    /// Equality filter.
    pub fn eq<V: ToScalarValue>(field: &str, value: V) -> Self {
        Self::comparison(field, CompareOp::Eq, value)
    }

    /// Inequality filter.
    pub fn ne<V: ToScalarValue>(field: &str, value: V) -> Self {
        Self::comparison(field, CompareOp::Ne, value)
    }

    /// Greater-than filter.
    pub fn gt<V: ToScalarValue>(field: &str, value: V) -> Self {
        Self::comparison(field, CompareOp::Gt, value)
    }

    /// Greater-than-or-equal filter.
    pub fn gte<V: ToScalarValue>(field: &str, value: V) -> Self {
        Self::comparison(field, CompareOp::Gte, value)
    }

    /// Less-than filter.
    pub fn lt<V: ToScalarValue>(field: &str, value: V) -> Self {
        Self::comparison(field, CompareOp::Lt, value)
    }

    /// Less-than-or-equal filter.
    pub fn lte<V: ToScalarValue>(field: &str, value: V) -> Self {
        Self::comparison(field, CompareOp::Lte, value)
    }

    /// IS NULL filter.
    #[must_use]
    pub fn is_null(field: &str) -> Self {
        Self {
            expr: FilterExpr::IsNull {
                field: field.to_string(),
            },
        }
    }

    /// IS NOT NULL filter.
    #[must_use]
    pub fn is_not_null(field: &str) -> Self {
        Self {
            expr: FilterExpr::IsNotNull {
                field: field.to_string(),
            },
        }
    }

    /// Membership filter.
    pub fn in_list<V: ToScalarValue>(field: &str, values: Vec<V>) -> Self {
        Self {
            expr: FilterExpr::InList {
                field: field.to_string(),
                values: values
                    .into_iter()
                    .map(ToScalarValue::to_scalar_value)
                    .collect(),
            },
        }
    }

    /// Pattern filter (`%` wildcards).
    #[must_use]
    pub fn like(field: &str, pattern: &str) -> Self {
        Self {
            expr: FilterExpr::Like {
                field: field.to_string(),
                pattern: pattern.to_string(),
            },
        }
    }

    /// Inclusive range filter.
    pub fn between<V: ToScalarValue>(field: &str, low: V, high: V) -> Self {
        Self {
            expr: FilterExpr::Between {
                field: field.to_string(),
                low: low.to_scalar_value(),
                high: high.to_scalar_value(),
            },
        }
    }

    /// Combines with another filter using AND.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self {
            expr: FilterExpr::And(Box::new(self.expr), Box::new(other.expr)),
        }
    }

    /// Combines with another filter using OR.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self {
            expr: FilterExpr::Or(Box::new(self.expr), Box::new(other.expr)),
        }
    }

    /// Negates the filter.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn not(self) -> Self {
        Self {
            expr: FilterExpr::Not(Box::new(self.expr)),
        }
    }

    /// Merges a sequence of filters with AND. Returns `None` when empty.
    pub fn all(filters: impl IntoIterator<Item = Self>) -> Option<Self> {
        filters.into_iter().reduce(Self::and)
    }

    /// Returns every attribute name the filter references.
    #[must_use]
    pub fn fields(&self) -> Vec<String> {
        let mut out = Vec::new();
        collect_fields(&self.expr, &mut out);
        out
    }

    /// Returns the underlying expression tree.
    #[must_use]
    pub const fn expr(&self) -> &FilterExpr {
        &self.expr
    }
}

fn collect_fields(expr: &FilterExpr, out: &mut Vec<String>) {
    match expr {
        FilterExpr::Comparison { field, .. }
        | FilterExpr::IsNull { field }
        | FilterExpr::IsNotNull { field }
        | FilterExpr::InList { field, .. }
        | FilterExpr::Like { field, .. }
        | FilterExpr::Between { field, .. } => {
            if !out.contains(field) {
                out.push(field.clone());
            }
        }
        FilterExpr::And(left, right) | FilterExpr::Or(left, right) => {
            collect_fields(left, out);
            collect_fields(right, out);
        }
        FilterExpr::Not(inner) => collect_fields(inner, out),
    }
}
