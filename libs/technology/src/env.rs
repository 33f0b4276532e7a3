//! Per-session technology context.

use std::sync::Arc;

use arcstr::ArcStr;
use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::param::{TechFactory, TechHandle};
use crate::tech::Technology;

/// The technologies available to a session, and which one is current.
///
/// Environments are ordinary values: each session or test owns its own.
#[derive(Debug, Default)]
pub struct Environment {
    techs: IndexMap<ArcStr, Arc<TechHandle>>,
    current: Option<ArcStr>,
}

impl Environment {
    /// Creates an environment with no technologies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds and registers a technology at its default state.
    ///
    /// The first technology registered becomes current.
    pub fn register(&mut self, factory: impl TechFactory + 'static) -> Result<Arc<TechHandle>> {
        let handle = Arc::new(TechHandle::new(factory)?);
        let name = handle.name();
        tracing::debug!(tech = %name, "registered technology");
        self.techs.insert(name.clone(), handle.clone());
        if self.current.is_none() {
            self.current = Some(name);
        }
        Ok(handle)
    }

    /// The handle of a registered technology.
    pub fn handle(&self, name: &str) -> Option<&Arc<TechHandle>> {
        self.techs.get(name)
    }

    /// The current snapshot of a registered technology.
    pub fn technology(&self, name: &str) -> Option<Arc<Technology>> {
        Some(self.handle(name)?.current())
    }

    /// Names of every registered technology.
    pub fn names(&self) -> impl Iterator<Item = &ArcStr> {
        self.techs.keys()
    }

    /// Makes a registered technology current.
    pub fn set_current(&mut self, name: &str) -> Result<()> {
        let (name, _) = self
            .techs
            .get_key_value(name)
            .ok_or_else(|| Error::NoSuchTechnology(name.into()))?;
        self.current = Some(name.clone());
        Ok(())
    }

    /// The handle of the current technology.
    pub fn current_handle(&self) -> Option<&Arc<TechHandle>> {
        self.handle(self.current.as_ref()?)
    }

    /// The current snapshot of the current technology.
    pub fn current(&self) -> Option<Arc<Technology>> {
        Some(self.current_handle()?.current())
    }
}
