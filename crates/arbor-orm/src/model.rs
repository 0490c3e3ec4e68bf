//! Model definitions and instances.
//!
//! A [`ModelDef`] is a description value: attributes, indexes, computed
//! accessors, scopes, associations, and hooks, bound to a backing table.
//! Definitions are validated once, when they are registered, instead of
//! relying on compile-time generics.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use arbor_core::ScalarValue;

use crate::association::AssociationDef;
use crate::error::{DefinitionError, Result};
use crate::filter::Filter;
use crate::hooks::HookRegistry;
use crate::schema::{AttributeDef, AttributeType, DefaultValue, IndexDef};
use crate::scope::{Scope, ScopeCall};

/// A computed read accessor.
pub type Getter = Arc<dyn Fn(&Instance) -> ScalarValue + Send + Sync>;
/// A computed write accessor.
pub type Setter = Arc<dyn Fn(&mut Instance, ScalarValue) + Send + Sync>;

/// A runtime row of a model: attribute name to value.
#[derive(Debug, Clone, PartialEq)]
pub struct Instance {
    model: String,
    values: BTreeMap<String, ScalarValue>,
}

impl Instance {
    /// Creates an empty instance of the named model.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            values: BTreeMap::new(),
        }
    }

    /// The model this instance belongs to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Reads an attribute value.
    #[must_use]
    pub fn get(&self, attribute: &str) -> Option<&ScalarValue> {
        self.values.get(attribute)
    }

    /// Writes an attribute value.
    pub fn set(&mut self, attribute: impl Into<String>, value: ScalarValue) {
        self.values.insert(attribute.into(), value);
    }

    /// All attribute values.
    #[must_use]
    pub const fn values(&self) -> &BTreeMap<String, ScalarValue> {
        &self.values
    }
}

/// Types that carry their own model definition.
///
/// This is the class-based registration form; the factory form builds a
/// [`ModelDef`] value directly. Both produce the same definition and are
/// interchangeable wherever a model reference is expected.
pub trait Entity {
    /// Returns this entity's model definition.
    fn definition() -> ModelDef;
}

/// A declarative model definition.
pub struct ModelDef {
    name: String,
    table: String,
    attributes: Vec<AttributeDef>,
    getters: BTreeMap<String, Getter>,
    setters: BTreeMap<String, Setter>,
    scopes: BTreeMap<String, Scope>,
    default_scope: Option<Filter>,
    indexes: Vec<IndexDef>,
    associations: Vec<AssociationDef>,
    hooks: HookRegistry,
}

impl ModelDef {
    /// Creates a definition for the named model.
    ///
    /// The backing table defaults to the lowercased model name; override
    /// it with [`Self::table`].
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let table = name.to_lowercase();
        Self {
            name,
            table,
            attributes: Vec::new(),
            getters: BTreeMap::new(),
            setters: BTreeMap::new(),
            scopes: BTreeMap::new(),
            default_scope: None,
            indexes: Vec::new(),
            associations: Vec::new(),
            hooks: HookRegistry::new(),
        }
    }

    /// Overrides the backing table name.
    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Adds an attribute.
    #[must_use]
    pub fn attribute(mut self, attribute: AttributeDef) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Adds managed `created_at`/`updated_at` timestamp attributes.
    ///
    /// Both carry a database-side default, so they are omittable at
    /// creation time while always present on a persisted row.
    #[must_use]
    pub fn timestamps(self) -> Self {
        let stamp = |name: &str| {
            AttributeDef::new(name, AttributeType::DateTime)
                .not_null()
                .default(DefaultValue::Expression("CURRENT_TIMESTAMP".to_string()))
        };
        self.attribute(stamp("created_at")).attribute(stamp("updated_at"))
    }

    /// Adds a named computed read accessor.
    #[must_use]
    pub fn getter<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Instance) -> ScalarValue + Send + Sync + 'static,
    {
        self.getters.insert(name.into(), Arc::new(f));
        self
    }

    /// Adds a named computed write accessor.
    #[must_use]
    pub fn setter<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&mut Instance, ScalarValue) + Send + Sync + 'static,
    {
        self.setters.insert(name.into(), Arc::new(f));
        self
    }

    /// Adds a named scope.
    #[must_use]
    pub fn scope(mut self, name: impl Into<String>, scope: Scope) -> Self {
        self.scopes.insert(name.into(), scope);
        self
    }

    /// Sets the default scope, applied before any named scopes.
    #[must_use]
    pub fn default_scope(mut self, filter: Filter) -> Self {
        self.default_scope = Some(filter);
        self
    }

    /// Adds a named index.
    #[must_use]
    pub fn index(mut self, index: IndexDef) -> Self {
        self.indexes.push(index);
        self
    }

    /// Adds an association.
    #[must_use]
    pub fn association(mut self, association: AssociationDef) -> Self {
        self.associations.push(association);
        self
    }

    /// Mutable access to the hook registry.
    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    /// The hook registry.
    #[must_use]
    pub const fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    /// Model name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Backing table name.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Declared attributes.
    #[must_use]
    pub fn attributes(&self) -> &[AttributeDef] {
        &self.attributes
    }

    /// Declared indexes.
    #[must_use]
    pub fn indexes(&self) -> &[IndexDef] {
        &self.indexes
    }

    /// Declared associations.
    #[must_use]
    pub fn associations(&self) -> &[AssociationDef] {
        &self.associations
    }

    /// Looks up an attribute by name.
    #[must_use]
    pub fn attribute_def(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Looks up an association by alias.
    #[must_use]
    pub fn association_def(&self, alias: &str) -> Option<&AssociationDef> {
        self.associations.iter().find(|a| a.alias == alias)
    }

    /// The primary key attribute, if declared.
    #[must_use]
    pub fn primary_key(&self) -> Option<&AttributeDef> {
        self.attributes.iter().find(|a| a.primary_key)
    }

    /// Attribute names that must appear in a creation payload.
    #[must_use]
    pub fn required_at_creation(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| !a.creation_optional())
            .map(|a| a.name.as_str())
            .collect()
    }

    /// Checks the definition for internal consistency.
    ///
    /// Association targets live in other definitions and are checked by
    /// the registry once every model is in.
    pub fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for attr in &self.attributes {
            if !seen.insert(attr.name.as_str()) {
                return Err(DefinitionError::DuplicateAttribute {
                    model: self.name.clone(),
                    attribute: attr.name.clone(),
                });
            }
        }

        if self.primary_key().is_none() {
            return Err(DefinitionError::MissingPrimaryKey(self.name.clone()));
        }
        if self.attributes.iter().filter(|a| a.auto_increment).count() > 1 {
            return Err(DefinitionError::MultipleAutoIncrement(self.name.clone()));
        }

        for (kind, names) in [
            ("getter", self.getters.keys().collect::<Vec<_>>()),
            ("setter", self.setters.keys().collect()),
            ("scope", self.scopes.keys().collect()),
        ] {
            for name in names {
                if seen.contains(name.as_str()) {
                    return Err(DefinitionError::NameCollision {
                        kind,
                        model: self.name.clone(),
                        name: name.clone(),
                    });
                }
            }
        }

        for index in &self.indexes {
            for field in &index.fields {
                if !seen.contains(field.as_str()) {
                    return Err(DefinitionError::UnknownAttribute {
                        model: self.name.clone(),
                        attribute: field.clone(),
                        context: format!("index '{}'", index.name),
                    });
                }
            }
        }

        for (name, scope) in &self.scopes {
            for field in scope.static_fields() {
                if !seen.contains(field.as_str()) {
                    return Err(DefinitionError::UnknownAttribute {
                        model: self.name.clone(),
                        attribute: field,
                        context: format!("scope '{name}'"),
                    });
                }
            }
        }
        if let Some(filter) = &self.default_scope {
            for field in filter.fields() {
                if !seen.contains(field.as_str()) {
                    return Err(DefinitionError::UnknownAttribute {
                        model: self.name.clone(),
                        attribute: field,
                        context: "default scope".to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Checks a creation payload against the creation shape.
    ///
    /// Every attribute that is required at creation must be present, and
    /// no key may name an undeclared attribute.
    pub fn check_create(&self, values: &BTreeMap<String, ScalarValue>) -> Result<()> {
        for key in values.keys() {
            if self.attribute_def(key).is_none() {
                return Err(DefinitionError::UnknownAttribute {
                    model: self.name.clone(),
                    attribute: key.clone(),
                    context: "creation payload".to_string(),
                });
            }
        }
        for required in self.required_at_creation() {
            if !values.contains_key(required) {
                return Err(DefinitionError::MissingRequiredAttribute {
                    model: self.name.clone(),
                    attribute: required.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Builds an instance from a creation payload.
    ///
    /// The payload is checked with [`Self::check_create`]; literal
    /// defaults are materialized for omitted attributes, while
    /// database-assigned values (auto-increment, expressions) stay NULL
    /// until the row comes back from the driver layer.
    pub fn create(&self, values: BTreeMap<String, ScalarValue>) -> Result<Instance> {
        self.check_create(&values)?;
        let mut instance = Instance::new(self.name.clone());
        for attr in &self.attributes {
            let value = values.get(&attr.name).cloned().unwrap_or_else(|| {
                match &attr.default {
                    DefaultValue::Bool(b) => ScalarValue::Bool(*b),
                    DefaultValue::Int(n) => ScalarValue::Int(*n),
                    DefaultValue::Float(x) => ScalarValue::Float(*x),
                    DefaultValue::Text(s) => ScalarValue::Text(s.clone()),
                    DefaultValue::None | DefaultValue::Null | DefaultValue::Expression(_) => {
                        ScalarValue::Null
                    }
                }
            });
            instance.set(attr.name.clone(), value);
        }
        Ok(instance)
    }

    /// Applies a computed read accessor.
    pub fn get_computed(&self, name: &str, instance: &Instance) -> Result<ScalarValue> {
        let getter = self.getters.get(name).ok_or_else(|| {
            DefinitionError::Validation(format!(
                "model '{}' has no getter '{name}'",
                self.name
            ))
        })?;
        Ok(getter(instance))
    }

    /// Applies a computed write accessor.
    pub fn set_computed(
        &self,
        name: &str,
        instance: &mut Instance,
        value: ScalarValue,
    ) -> Result<()> {
        let setter = self.setters.get(name).ok_or_else(|| {
            DefinitionError::Validation(format!(
                "model '{}' has no setter '{name}'",
                self.name
            ))
        })?;
        setter(instance, value);
        Ok(())
    }

    /// Resolves named scope invocations into one combined filter.
    ///
    /// The default scope, when set, is applied first; the named scopes
    /// follow in call order, all merged with AND. Returns `None` when
    /// nothing contributes a filter.
    pub fn scoped(&self, calls: &[ScopeCall]) -> Result<Option<Filter>> {
        let mut filters = Vec::new();
        if let Some(default) = &self.default_scope {
            filters.push(default.clone());
        }
        for call in calls {
            let scope = self.scopes.get(&call.name).ok_or_else(|| {
                DefinitionError::UnknownScope {
                    model: self.name.clone(),
                    scope: call.name.clone(),
                }
            })?;
            match scope {
                Scope::Static(filter) => {
                    if !call.args.is_empty() {
                        return Err(DefinitionError::StaticScopeArguments {
                            model: self.name.clone(),
                            scope: call.name.clone(),
                        });
                    }
                    filters.push(filter.clone());
                }
                Scope::Dynamic(f) => filters.push(f(&call.args)),
            }
        }
        Ok(Filter::all(filters))
    }
}

impl fmt::Debug for ModelDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelDef")
            .field("name", &self.name)
            .field("table", &self.table)
            .field("attributes", &self.attributes)
            .field("indexes", &self.indexes)
            .field("associations", &self.associations)
            .field("scopes", &self.scopes.keys().collect::<Vec<_>>())
            .field("getters", &self.getters.keys().collect::<Vec<_>>())
            .field("setters", &self.setters.keys().collect::<Vec<_>>())
            .field("hooks", &self.hooks)
            .finish()
    }
}
