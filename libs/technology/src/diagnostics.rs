//! Consistency diagnostics recorded while building a technology.
//!
//! Diagnostics are advisory: they are meant for technology authors and never
//! prevent shapes from being computed.

use std::fmt::{Debug, Display};

use arcstr::ArcStr;
use serde::{Deserialize, Serialize};
use tracing::Level;

/// A diagnostic issue that should be reported to technology authors.
pub trait Diagnostic: Debug + Display {
    /// Returns the severity of this issue.
    ///
    /// The default implementation returns [`Severity::default`].
    fn severity(&self) -> Severity {
        Default::default()
    }
}

/// An enumeration of possible severity levels.
#[derive(Copy, Clone, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Severity {
    /// An informational message.
    Info,
    /// A warning.
    #[default]
    Warning,
    /// An error. The offending entry was not added to the technology.
    Error,
}

impl Severity {
    /// Returns log level corresponding to this severity.
    #[inline]
    pub const fn as_tracing_level(&self) -> Level {
        match *self {
            Self::Info => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error => Level::ERROR,
        }
    }

    /// Returns `true` if the severity is [`Severity::Error`].
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(*self, Self::Error)
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A collection of issues.
#[derive(Debug, Clone)]
pub struct IssueSet<T> {
    issues: Vec<T>,
    num_errors: usize,
    num_warnings: usize,
}

impl<T> IssueSet<T> {
    /// Creates a new, empty issue set.
    #[inline]
    pub fn new() -> Self {
        Self {
            issues: Vec::new(),
            num_errors: 0,
            num_warnings: 0,
        }
    }

    /// Returns an iterator over all issues in the set.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.issues.iter()
    }

    /// The number of issues in this issue set.
    #[inline]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Returns `true` if this issue set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl<T: Diagnostic> IssueSet<T> {
    /// Adds the given issue to the issue set.
    pub fn add(&mut self, issue: T) {
        match issue.severity() {
            Severity::Error => self.num_errors += 1,
            Severity::Warning => self.num_warnings += 1,
            Severity::Info => (),
        };
        self.issues.push(issue);
    }

    /// Moves every issue of `other` into this set.
    pub fn extend(&mut self, other: IssueSet<T>) {
        for issue in other {
            self.add(issue);
        }
    }

    /// Returns `true` if this issue set contains an error.
    pub fn has_error(&self) -> bool {
        self.num_errors > 0
    }

    /// The number of errors in this issue set.
    #[inline]
    pub fn num_errors(&self) -> usize {
        self.num_errors
    }

    /// Returns `true` if this issue set contains a warning.
    pub fn has_warning(&self) -> bool {
        self.num_warnings > 0
    }

    /// The number of warnings in this issue set.
    #[inline]
    pub fn num_warnings(&self) -> usize {
        self.num_warnings
    }
}

impl<T> IntoIterator for IssueSet<T> {
    type Item = T;
    type IntoIter = <Vec<T> as IntoIterator>::IntoIter;
    fn into_iter(self) -> Self::IntoIter {
        self.issues.into_iter()
    }
}

impl<T> Default for IssueSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Display> Display for IssueSet<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for issue in self.issues.iter() {
            writeln!(f, "{}", issue)?;
        }
        Ok(())
    }
}

/// An issue found in a technology definition.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct TechIssue {
    cause: Cause,
    severity: Severity,
}

/// The underlying cause of a [`TechIssue`].
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Cause {
    /// An arc connected to a contact does not have a layer on the contact.
    ContactLayerMismatch {
        /// The contact node template.
        node: ArcStr,
        /// The connected arc template with no matching layer.
        arc: ArcStr,
    },
    /// A transistor template does not have the expected number of ports.
    TransistorPortCount {
        /// The transistor node template.
        node: ArcStr,
        /// The number of ports found.
        found: usize,
    },
    /// A transistor's gate and diffusion ports are not in
    /// gate, diffusion, gate, diffusion order.
    TransistorPortOrder {
        /// The transistor node template.
        node: ArcStr,
        /// The first port found out of place.
        port: ArcStr,
    },
    /// A layer is not used by any arc or node template.
    UnusedLayer {
        /// The layer name.
        layer: ArcStr,
    },
    /// A template was rejected while loading a technology description.
    RejectedTemplate {
        /// The template name.
        template: ArcStr,
        /// The rejection message.
        message: String,
    },
}

impl Diagnostic for TechIssue {
    fn severity(&self) -> Severity {
        self.severity
    }
}

impl TechIssue {
    /// Creates a new issue from the given cause and severity.
    pub(crate) fn new(cause: Cause, severity: Severity) -> Self {
        Self { cause, severity }
    }

    /// Gets the underlying cause of this issue.
    #[inline]
    pub fn cause(&self) -> &Cause {
        &self.cause
    }

    /// Creates a new issue and logs it immediately.
    ///
    /// The log level is selected according to the given severity.
    pub(crate) fn new_and_log(tech: &str, cause: Cause, severity: Severity) -> Self {
        let result = Self::new(cause, severity);
        match severity {
            Severity::Info => {
                tracing::event!(Level::INFO, tech, issue = ?result.cause, "{}", result)
            }
            Severity::Warning => {
                tracing::event!(Level::WARN, tech, issue = ?result.cause, "{}", result)
            }
            Severity::Error => {
                tracing::event!(Level::ERROR, tech, issue = ?result.cause, "{}", result)
            }
        }
        result
    }
}

impl Display for TechIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.severity, self.cause)
    }
}

impl Display for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContactLayerMismatch { node, arc } => write!(
                f,
                "contact `{}` connects to arc `{}` but has none of its layers",
                node, arc
            ),
            Self::TransistorPortCount { node, found } => write!(
                f,
                "transistor `{}` has {} ports (expected 4)",
                node, found
            ),
            Self::TransistorPortOrder { node, port } => write!(
                f,
                "transistor `{}` has port `{}` out of gate/diffusion order",
                node, port
            ),
            Self::UnusedLayer { layer } => {
                write!(f, "layer `{}` is not used by any arc or node", layer)
            }
            Self::RejectedTemplate { template, message } => {
                write!(f, "template `{}` was rejected: {}", template, message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(severity: Severity) -> TechIssue {
        TechIssue::new(
            Cause::UnusedLayer {
                layer: arcstr::literal!("metal-9"),
            },
            severity,
        )
    }

    #[test]
    fn issue_set_counters() {
        let mut issues: IssueSet<TechIssue> = IssueSet::new();
        issues.add(issue(Severity::Info));
        assert_eq!(issues.num_errors(), 0);
        assert_eq!(issues.num_warnings(), 0);
        issues.add(issue(Severity::Warning));
        assert!(issues.has_warning());
        assert!(!issues.has_error());
        issues.add(issue(Severity::Error));
        assert_eq!(issues.num_errors(), 1);
        assert_eq!(issues.num_warnings(), 1);
        assert_eq!(issues.len(), 3);
    }

    #[test]
    fn severity_as_tracing_level() {
        assert_eq!(Severity::Info.as_tracing_level(), Level::INFO);
        assert_eq!(Severity::Warning.as_tracing_level(), Level::WARN);
        assert_eq!(Severity::Error.as_tracing_level(), Level::ERROR);
        assert_eq!(Severity::default(), Severity::Warning);
    }

    #[test]
    fn display_mentions_template() {
        let issue = TechIssue::new(
            Cause::TransistorPortCount {
                node: arcstr::literal!("nmos"),
                found: 3,
            },
            Severity::Warning,
        );
        assert_eq!(
            issue.to_string(),
            "warning: transistor `nmos` has 3 ports (expected 4)"
        );
    }
}
