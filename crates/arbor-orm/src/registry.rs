//! The model registry.
//!
//! Registration is the one-time setup step that validates each model
//! definition. Association targets are allowed to arrive after their
//! referrers, so cross-model checks run separately once every model is
//! in, via [`Registry::resolve_associations`] or [`Registry::sync_all`].

use std::collections::BTreeMap;

use tracing::debug;

use crate::association::Association;
use crate::error::{DefinitionError, Result};
use crate::hooks::{HookContext, HookPhase};
use crate::model::{Entity, ModelDef};

/// Holds every registered model definition.
///
/// The two registration forms are interchangeable: a type implementing
/// [`Entity`] registers through [`Self::register_entity`], a built
/// [`ModelDef`] value through [`Self::register`] or [`Self::define`].
/// Either way the stored definition is the same, and associations resolve
/// across forms.
#[derive(Debug, Default)]
pub struct Registry {
    models: BTreeMap<String, ModelDef>,
    order: Vec<String>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a built definition after validating it.
    pub fn register(&mut self, def: ModelDef) -> Result<()> {
        def.validate()?;
        let name = def.name().to_string();
        if self.models.contains_key(&name) {
            return Err(DefinitionError::DuplicateModel(name));
        }
        debug!(
            model = %name,
            table = def.table_name(),
            attributes = def.attributes().len(),
            "registered model"
        );
        self.order.push(name.clone());
        self.models.insert(name, def);
        Ok(())
    }

    /// Registers a type that carries its own definition.
    pub fn register_entity<T: Entity>(&mut self) -> Result<()> {
        self.register(T::definition())
    }

    /// Factory-style registration: builds a definition in place.
    pub fn define(
        &mut self,
        name: impl Into<String>,
        build: impl FnOnce(ModelDef) -> ModelDef,
    ) -> Result<()> {
        self.register(build(ModelDef::new(name)))
    }

    /// Looks up a registered model.
    pub fn get(&self, name: &str) -> Result<&ModelDef> {
        self.models
            .get(name)
            .ok_or_else(|| DefinitionError::UnknownModel(name.to_string()))
    }

    /// Mutable access to a registered model, for attaching hooks or
    /// scopes after registration.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut ModelDef> {
        self.models
            .get_mut(name)
            .ok_or_else(|| DefinitionError::UnknownModel(name.to_string()))
    }

    /// Registered models in registration order.
    pub fn models(&self) -> impl Iterator<Item = &ModelDef> {
        self.order.iter().filter_map(|name| self.models.get(name))
    }

    /// Resolves one association of a model by alias.
    pub fn association(&self, model: &str, alias: &str) -> Result<Association<'_>> {
        let source = self.get(model)?;
        let def = source.association_def(alias).ok_or_else(|| {
            DefinitionError::UnknownAssociation {
                model: model.to_string(),
                alias: alias.to_string(),
            }
        })?;
        let target = self.get(&def.target)?;
        def.validate_against(source, target)?;
        Ok(Association::new(def, source, target))
    }

    /// Validates every association of every registered model.
    pub fn resolve_associations(&self) -> Result<()> {
        for source in self.models() {
            for def in source.associations() {
                let target = self.get(&def.target)?;
                def.validate_against(source, target)?;
            }
        }
        Ok(())
    }

    /// Synchronizes one model: validates its associations and fires its
    /// after-sync hooks.
    pub async fn sync(&self, name: &str) -> Result<()> {
        let model = self.get(name)?;
        for def in model.associations() {
            let target = self.get(&def.target)?;
            def.validate_against(model, target)?;
        }
        model
            .hooks()
            .run(name, HookPhase::AfterSync, HookContext::Sync)
            .await?;
        debug!(model = name, "schema synchronized");
        Ok(())
    }

    /// Synchronizes every model in registration order.
    pub async fn sync_all(&self) -> Result<()> {
        for name in &self.order {
            self.sync(name).await?;
        }
        Ok(())
    }
}
