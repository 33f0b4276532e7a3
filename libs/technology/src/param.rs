//! Technology parameters and state snapshots.
//!
//! A technology is built from an immutable [`State`]. Changing a parameter
//! builds a new [`Technology`] from a new state; technologies built from the
//! old state remain valid for as long as anyone holds them.

use std::fmt::Display;
use std::sync::{Arc, PoisonError, RwLock};

use arcstr::ArcStr;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tech::Technology;

/// The value of a technology parameter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// A boolean.
    Bool(bool),
    /// An integer.
    Int(i64),
}

impl ParamValue {
    /// The integer value, if this is an integer.
    pub fn as_int(&self) -> Option<i64> {
        match *self {
            Self::Int(v) => Some(v),
            Self::Bool(_) => None,
        }
    }

    /// The boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(v) => Some(v),
            Self::Int(_) => None,
        }
    }
}

impl Display for ParamValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// The type and default of a parameter.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParamKind {
    /// An integer in `min..=max`.
    Int {
        /// The smallest allowed value.
        min: i64,
        /// The largest allowed value.
        max: i64,
        /// The default value.
        default: i64,
    },
    /// A boolean.
    Bool {
        /// The default value.
        default: bool,
    },
}

impl ParamKind {
    /// The default value.
    pub fn default_value(&self) -> ParamValue {
        match *self {
            Self::Int { default, .. } => ParamValue::Int(default),
            Self::Bool { default } => ParamValue::Bool(default),
        }
    }

    fn check(&self, name: &ArcStr, value: ParamValue) -> Result<()> {
        match (*self, value) {
            (Self::Int { min, max, .. }, ParamValue::Int(v)) => {
                if v < min || v > max {
                    return Err(Error::InvalidParam {
                        name: name.clone(),
                        reason: format!("{} is not in {}..={}", v, min, max),
                    });
                }
                Ok(())
            }
            (Self::Bool { .. }, ParamValue::Bool(_)) => Ok(()),
            (Self::Int { .. }, ParamValue::Bool(_)) => Err(Error::InvalidParam {
                name: name.clone(),
                reason: "expected an integer".to_string(),
            }),
            (Self::Bool { .. }, ParamValue::Int(_)) => Err(Error::InvalidParam {
                name: name.clone(),
                reason: "expected a boolean".to_string(),
            }),
        }
    }
}

/// The parameters a technology accepts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamSchema {
    params: IndexMap<ArcStr, ParamKind>,
}

impl ParamSchema {
    /// Creates an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an integer parameter.
    pub fn int(mut self, name: impl Into<ArcStr>, min: i64, max: i64, default: i64) -> Self {
        self.params
            .insert(name.into(), ParamKind::Int { min, max, default });
        self
    }

    /// Adds a boolean parameter.
    pub fn bool(mut self, name: impl Into<ArcStr>, default: bool) -> Self {
        self.params.insert(name.into(), ParamKind::Bool { default });
        self
    }

    /// Looks up a parameter.
    pub fn get(&self, name: &str) -> Option<&ParamKind> {
        self.params.get(name)
    }

    /// Iterates over parameters in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&ArcStr, &ParamKind)> {
        self.params.iter()
    }

    /// The state holding every parameter's default.
    pub fn default_state(&self) -> State {
        State {
            values: Arc::new(
                self.params
                    .iter()
                    .map(|(k, v)| (k.clone(), v.default_value()))
                    .collect(),
            ),
        }
    }

    /// Checks a single assignment against the schema.
    pub fn check(&self, name: &str, value: ParamValue) -> Result<()> {
        let (name, kind) = self
            .params
            .get_key_value(name)
            .ok_or_else(|| Error::UnknownParam(name.into()))?;
        kind.check(name, value)
    }

    /// Checks every value of a state against the schema.
    pub fn validate(&self, state: &State) -> Result<()> {
        for (name, value) in state.iter() {
            self.check(name, *value)?;
        }
        Ok(())
    }
}

/// An immutable snapshot of parameter values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct State {
    values: Arc<IndexMap<ArcStr, ParamValue>>,
}

impl State {
    /// The value of a parameter.
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.values.get(name).copied()
    }

    /// The value of an integer parameter.
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name)?.as_int()
    }

    /// The value of a boolean parameter.
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name)?.as_bool()
    }

    /// Iterates over every assignment.
    pub fn iter(&self) -> impl Iterator<Item = (&ArcStr, &ParamValue)> {
        self.values.iter()
    }

    /// A new state with one value replaced.
    pub fn with(&self, name: impl Into<ArcStr>, value: impl Into<ParamValue>) -> Self {
        let mut values = (*self.values).clone();
        values.insert(name.into(), value.into());
        Self {
            values: Arc::new(values),
        }
    }
}

/// Builds technologies from parameter states.
pub trait TechFactory: Send + Sync {
    /// The technology name.
    fn name(&self) -> ArcStr;

    /// The parameters this technology accepts.
    fn schema(&self) -> ParamSchema {
        ParamSchema::new()
    }

    /// Builds a technology for the given, already validated, state.
    fn build(&self, state: &State) -> Result<Technology>;
}

/// A technology whose parameters may change.
///
/// Readers take [`TechHandle::current`] snapshots; a parameter change swaps
/// in a newly built snapshot without affecting the old one. Callers that need
/// up-to-date shapes must take a new snapshot after the change.
pub struct TechHandle {
    factory: Arc<dyn TechFactory>,
    schema: ParamSchema,
    current: RwLock<Arc<Technology>>,
}

impl std::fmt::Debug for TechHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TechHandle")
            .field("name", &self.factory.name())
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl TechHandle {
    /// Builds the factory's technology at its default state.
    pub fn new(factory: impl TechFactory + 'static) -> Result<Self> {
        let schema = factory.schema();
        let tech = factory.build(&schema.default_state())?;
        Ok(Self {
            factory: Arc::new(factory),
            schema,
            current: RwLock::new(Arc::new(tech)),
        })
    }

    /// The technology name.
    pub fn name(&self) -> ArcStr {
        self.factory.name()
    }

    /// The parameter schema.
    pub fn schema(&self) -> &ParamSchema {
        &self.schema
    }

    /// The current snapshot.
    pub fn current(&self) -> Arc<Technology> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The current state.
    pub fn state(&self) -> State {
        self.current().state().clone()
    }

    /// Rebuilds the technology for a new state and makes it current.
    ///
    /// On error the current snapshot is unchanged.
    pub fn set_state(&self, state: State) -> Result<Arc<Technology>> {
        self.schema.validate(&state)?;
        let tech = Arc::new(self.factory.build(&state)?);
        tracing::info!(tech = %tech.name(), state = ?state, "technology state changed");
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = tech.clone();
        Ok(tech)
    }

    /// Changes one parameter. See [`TechHandle::set_state`].
    pub fn set_param(&self, name: &str, value: impl Into<ParamValue>) -> Result<Arc<Technology>> {
        let value = value.into();
        self.schema.check(name, value)?;
        self.set_state(self.state().with(name, value))
    }
}
