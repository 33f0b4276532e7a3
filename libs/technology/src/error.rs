//! Error types and error handling utilities.

use std::sync::Arc;

use arcstr::ArcStr;
use geometry::units::UnitError;

/// A result type returning technology errors.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The kind of catalog entry an error refers to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum EntryKind {
    /// A layer.
    Layer,
    /// An arc template.
    Arc,
    /// A node template.
    Node,
    /// A foundry.
    Foundry,
}

/// The error type for technology construction and parameter changes.
#[derive(thiserror::Error, Debug, Clone)]
pub enum Error {
    /// A numeric value was negative or overflowed after grid conversion.
    ///
    /// The offending template is not created; other templates are unaffected.
    #[error("technology `{tech}`, template `{template}`: invalid {what} ({value})")]
    InvalidValue {
        /// The technology name.
        tech: ArcStr,
        /// The template being constructed.
        template: ArcStr,
        /// The quantity that was rejected.
        what: &'static str,
        /// The rejected value, as given.
        value: String,
    },
    /// A template is internally inconsistent.
    ///
    /// Indicates a bug in the technology definition rather than bad user input.
    #[error("technology `{tech}`, template `{template}` is malformed: {reason}")]
    MalformedTemplate {
        /// The technology name.
        tech: ArcStr,
        /// The offending template.
        template: ArcStr,
        /// A description of the inconsistency.
        reason: String,
    },
    /// Two entries of the same kind share a name.
    #[error("technology `{tech}` already has a {kind:?} named `{name}`")]
    DuplicateName {
        /// The technology name.
        tech: ArcStr,
        /// The kind of entry.
        kind: EntryKind,
        /// The duplicated name.
        name: ArcStr,
    },
    /// A referenced entry does not exist.
    #[error("technology `{tech}` has no {kind:?} named `{name}`")]
    NotFound {
        /// The technology name.
        tech: ArcStr,
        /// The kind of entry.
        kind: EntryKind,
        /// The missing name.
        name: ArcStr,
    },
    /// A parameter name is not part of the technology's parameter schema.
    #[error("unknown technology parameter `{0}`")]
    UnknownParam(ArcStr),
    /// A parameter value has the wrong type or is out of range.
    #[error("invalid value for technology parameter `{name}`: {reason}")]
    InvalidParam {
        /// The parameter name.
        name: ArcStr,
        /// Why the value was rejected.
        reason: String,
    },
    /// A technology description could not be parsed.
    #[error("error parsing technology description: {0}")]
    Description(#[from] Arc<toml::de::Error>),
    /// A technology description referenced an unknown function or flag name.
    #[error("unknown {what} name `{name}` in technology description")]
    UnknownName {
        /// What kind of name was expected.
        what: &'static str,
        /// The unrecognized name.
        name: String,
    },
    /// A lambda value could not be converted to grid units.
    #[error(transparent)]
    Unit(#[from] UnitError),
    /// The environment has no technology with the given name.
    #[error("no technology named `{0}`")]
    NoSuchTechnology(ArcStr),
}

impl From<toml::de::Error> for Error {
    fn from(value: toml::de::Error) -> Self {
        Self::Description(Arc::new(value))
    }
}
