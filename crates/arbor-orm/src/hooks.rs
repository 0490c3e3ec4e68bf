//! Lifecycle hooks.
//!
//! Hooks are async callbacks registered against a fixed set of lifecycle
//! phases. Hooks for the same phase run in registration order, each
//! awaited before the next. A failing hook stops the remaining hooks for
//! that dispatch and propagates its error.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::trace;

use crate::error::{DefinitionError, Result};
use crate::filter::Filter;
use crate::model::Instance;

/// The fixed set of lifecycle phases hooks can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HookPhase {
    /// Before a find operation runs.
    BeforeFind,
    /// After a find operation returns its rows.
    AfterFind,
    /// Before an instance is created.
    BeforeCreate,
    /// After an instance is created.
    AfterCreate,
    /// Before an instance is destroyed.
    BeforeDestroy,
    /// After an instance is destroyed.
    AfterDestroy,
    /// After the model's schema has been synchronized.
    AfterSync,
}

impl HookPhase {
    /// Returns the phase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BeforeFind => "beforeFind",
            Self::AfterFind => "afterFind",
            Self::BeforeCreate => "beforeCreate",
            Self::AfterCreate => "afterCreate",
            Self::BeforeDestroy => "beforeDestroy",
            Self::AfterDestroy => "afterDestroy",
            Self::AfterSync => "afterSync",
        }
    }

    /// Whether a context payload is shaped for this phase.
    #[must_use]
    pub const fn accepts(self, ctx: &HookContext) -> bool {
        matches!(
            (self, ctx),
            (Self::BeforeFind, HookContext::Find(_))
                | (Self::AfterFind, HookContext::Rows(_))
                | (
                    Self::BeforeCreate | Self::AfterCreate | Self::BeforeDestroy,
                    HookContext::Instance(_)
                )
                | (Self::AfterDestroy, HookContext::Destroyed(_, _))
                | (Self::AfterSync, HookContext::Sync)
        )
    }
}

/// Options describing a find operation, passed to find-phase hooks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    /// The filter the find runs with.
    pub filter: Option<Filter>,
    /// Row limit.
    pub limit: Option<u32>,
}

/// Options describing a destroy operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DestroyOptions {
    /// Hard delete rather than a soft delete.
    pub force: bool,
}

/// Phase-shaped hook payload.
#[derive(Debug, Clone)]
pub enum HookContext {
    /// `beforeFind`: the options the find will run with.
    Find(FindOptions),
    /// `afterFind`: the rows the find returned.
    Rows(Vec<Instance>),
    /// `beforeCreate`, `afterCreate`, `beforeDestroy`: the instance.
    Instance(Instance),
    /// `afterDestroy`: the destroyed instance and the operation options.
    Destroyed(Instance, DestroyOptions),
    /// `afterSync`: no domain arguments.
    Sync,
}

type HookFn = Arc<dyn Fn(HookContext) -> BoxFuture<'static, Result<()>> + Send + Sync>;

struct Hook {
    name: Option<String>,
    callback: HookFn,
}

/// Per-model hook storage, keyed by phase, ordered by registration.
#[derive(Default)]
pub struct HookRegistry {
    hooks: BTreeMap<HookPhase, Vec<Hook>>,
}

impl HookRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an anonymous hook for a phase.
    pub fn add<F, Fut>(&mut self, phase: HookPhase, callback: F)
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.push(phase, None, callback);
    }

    /// Registers a named hook for a phase. Named hooks can be removed.
    pub fn add_named<F, Fut>(&mut self, phase: HookPhase, name: impl Into<String>, callback: F)
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        self.push(phase, Some(name.into()), callback);
    }

    fn push<F, Fut>(&mut self, phase: HookPhase, name: Option<String>, callback: F)
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let callback: HookFn = Arc::new(move |ctx| Box::pin(callback(ctx)));
        self.hooks
            .entry(phase)
            .or_default()
            .push(Hook { name, callback });
    }

    /// Removes the named hook for a phase. Returns whether one existed.
    pub fn remove(&mut self, phase: HookPhase, name: &str) -> bool {
        let Some(hooks) = self.hooks.get_mut(&phase) else {
            return false;
        };
        let before = hooks.len();
        hooks.retain(|h| h.name.as_deref() != Some(name));
        hooks.len() != before
    }

    /// Number of hooks registered for a phase.
    #[must_use]
    pub fn count(&self, phase: HookPhase) -> usize {
        self.hooks.get(&phase).map_or(0, Vec::len)
    }

    /// Runs the hooks for a phase in registration order.
    ///
    /// The context must be shaped for the phase; a mismatch is rejected
    /// before any hook runs.
    pub async fn run(&self, model: &str, phase: HookPhase, ctx: HookContext) -> Result<()> {
        if !phase.accepts(&ctx) {
            return Err(DefinitionError::HookContextMismatch {
                phase: phase.as_str(),
            });
        }
        let Some(hooks) = self.hooks.get(&phase) else {
            return Ok(());
        };
        for hook in hooks {
            trace!(
                model,
                phase = phase.as_str(),
                hook = hook.name.as_deref().unwrap_or("<anonymous>"),
                "running hook"
            );
            (hook.callback)(ctx.clone()).await?;
        }
        Ok(())
    }
}

impl fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (phase, hooks) in &self.hooks {
            map.entry(&phase.as_str(), &hooks.len());
        }
        map.finish()
    }
}
