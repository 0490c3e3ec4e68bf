//! Associations between models.
//!
//! An [`AssociationDef`] names the related model; the ends are resolved
//! through the registry, so referring to a model that is registered later
//! (the usual circular-reference setup) is fine. The resolved
//! [`Association`] view carries the helper operations generated for the
//! declaration: a filter selecting the related rows, writing the linking
//! key, and creating a related instance.

use serde::{Deserialize, Serialize};

use arbor_core::ScalarValue;

use crate::error::{DefinitionError, Result};
use crate::filter::Filter;
use crate::model::{Instance, ModelDef};

/// Association kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssociationKind {
    /// The foreign key lives on the declaring model.
    BelongsTo,
    /// The foreign key lives on the target model.
    HasMany,
}

/// A declared association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationDef {
    /// Association kind.
    pub kind: AssociationKind,
    /// Eager-load alias the association is addressed by.
    pub alias: String,
    /// Name of the target model.
    pub target: String,
    /// Foreign key attribute. Defaults to `<alias>_id` when unset.
    pub foreign_key: Option<String>,
    /// For belongs-to: the referenced attribute on the target.
    /// For has-many: the referenced attribute on the declaring model.
    /// Defaults to `id`.
    pub target_key: String,
}

impl AssociationDef {
    /// Declares a belongs-to association under the given alias.
    #[must_use]
    pub fn belongs_to(alias: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind: AssociationKind::BelongsTo,
            alias: alias.into(),
            target: target.into(),
            foreign_key: None,
            target_key: "id".to_string(),
        }
    }

    /// Declares a has-many association under the given alias.
    #[must_use]
    pub fn has_many(alias: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            kind: AssociationKind::HasMany,
            alias: alias.into(),
            target: target.into(),
            foreign_key: None,
            target_key: "id".to_string(),
        }
    }

    /// Sets the foreign key attribute.
    #[must_use]
    pub fn foreign_key(mut self, key: impl Into<String>) -> Self {
        self.foreign_key = Some(key.into());
        self
    }

    /// Sets the referenced key attribute.
    #[must_use]
    pub fn target_key(mut self, key: impl Into<String>) -> Self {
        self.target_key = key.into();
        self
    }

    /// The foreign key attribute, defaulted from the alias when unset.
    #[must_use]
    pub fn effective_foreign_key(&self) -> String {
        self.foreign_key
            .clone()
            .unwrap_or_else(|| format!("{}_id", self.alias))
    }

    /// Checks both ends of the association against resolved definitions.
    pub(crate) fn validate_against(&self, source: &ModelDef, target: &ModelDef) -> Result<()> {
        let fk = self.effective_foreign_key();
        let (fk_owner, key_owner) = match self.kind {
            AssociationKind::BelongsTo => (source, target),
            AssociationKind::HasMany => (target, source),
        };
        if fk_owner.attribute_def(&fk).is_none() {
            return Err(DefinitionError::UnknownAttribute {
                model: fk_owner.name().to_string(),
                attribute: fk,
                context: format!("association '{}' of model '{}'", self.alias, source.name()),
            });
        }
        if key_owner.attribute_def(&self.target_key).is_none() {
            return Err(DefinitionError::UnknownAttribute {
                model: key_owner.name().to_string(),
                attribute: self.target_key.clone(),
                context: format!("association '{}' of model '{}'", self.alias, source.name()),
            });
        }
        Ok(())
    }
}

/// An association with both ends resolved.
#[derive(Debug, Clone, Copy)]
pub struct Association<'a> {
    def: &'a AssociationDef,
    source: &'a ModelDef,
    target: &'a ModelDef,
}

impl<'a> Association<'a> {
    pub(crate) const fn new(
        def: &'a AssociationDef,
        source: &'a ModelDef,
        target: &'a ModelDef,
    ) -> Self {
        Self {
            def,
            source,
            target,
        }
    }

    /// The declaration this view was resolved from.
    #[must_use]
    pub const fn def(&self) -> &'a AssociationDef {
        self.def
    }

    /// The declaring model.
    #[must_use]
    pub const fn source(&self) -> &'a ModelDef {
        self.source
    }

    /// The related model.
    #[must_use]
    pub const fn target(&self) -> &'a ModelDef {
        self.target
    }

    /// The filter selecting the rows associated with `instance`.
    #[must_use]
    pub fn related_filter(&self, instance: &Instance) -> Filter {
        let fk = self.def.effective_foreign_key();
        match self.def.kind {
            AssociationKind::BelongsTo => Filter::eq(
                &self.def.target_key,
                instance.get(&fk).cloned().unwrap_or(ScalarValue::Null),
            ),
            AssociationKind::HasMany => Filter::eq(
                &fk,
                instance
                    .get(&self.def.target_key)
                    .cloned()
                    .unwrap_or(ScalarValue::Null),
            ),
        }
    }

    /// Writes the linking key on the declaring instance.
    ///
    /// Only belongs-to owns its foreign key; for has-many the link lives
    /// on the related rows and is written by [`Self::create_related`].
    pub fn set_related(&self, instance: &mut Instance, key: ScalarValue) -> Result<()> {
        match self.def.kind {
            AssociationKind::BelongsTo => {
                instance.set(self.def.effective_foreign_key(), key);
                Ok(())
            }
            AssociationKind::HasMany => Err(DefinitionError::Validation(format!(
                "association '{}' is has-many; set the key on the related instance",
                self.def.alias
            ))),
        }
    }

    /// Creates a related instance from a creation payload and links it.
    ///
    /// The payload is validated against the target model's creation
    /// shape. For belongs-to, the declaring instance's foreign key is
    /// updated to the new row's key; for has-many, the new row's foreign
    /// key is pointed back at the declaring instance.
    pub fn create_related(
        &self,
        instance: &mut Instance,
        values: std::collections::BTreeMap<String, ScalarValue>,
    ) -> Result<Instance> {
        let mut created = self.target.create(values)?;
        let fk = self.def.effective_foreign_key();
        match self.def.kind {
            AssociationKind::BelongsTo => {
                let key = created
                    .get(&self.def.target_key)
                    .cloned()
                    .unwrap_or(ScalarValue::Null);
                instance.set(fk, key);
            }
            AssociationKind::HasMany => {
                let key = instance
                    .get(&self.def.target_key)
                    .cloned()
                    .unwrap_or(ScalarValue::Null);
                created.set(fk, key);
            }
        }
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_foreign_key_defaults_from_alias() {
        let def = AssociationDef::belongs_to("group", "UserGroup");
        assert_eq!(def.effective_foreign_key(), "group_id");
        let def = def.foreign_key("owner_group");
        assert_eq!(def.effective_foreign_key(), "owner_group");
    }

    #[test]
    fn test_target_key_defaults_to_id() {
        let def = AssociationDef::has_many("posts", "UserPost");
        assert_eq!(def.target_key, "id");
    }

    #[test]
    fn test_serializes() {
        let def = AssociationDef::belongs_to("group", "UserGroup").foreign_key("group_id");
        let json = serde_json::to_string(&def).unwrap();
        let back: AssociationDef = serde_json::from_str(&json).unwrap();
        assert_eq!(def, back);
    }
}
