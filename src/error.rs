//! Error types for config parsing and assembly construction.

use thiserror::Error;

use crate::data_structures::part::{AttachPointId, PartId};

/// Errors produced while parsing config text or typed config values.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Unbalanced braces or a stray token in config text.
    #[error("syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// A value could not be parsed as the requested kind.
    #[error("cannot parse '{value}' as {kind}")]
    InvalidValue { value: String, kind: &'static str },

    /// A delimited value has fewer fields than the kind needs.
    #[error("expected at least {expected} fields in '{value}', found {found}")]
    TooFewFields {
        value: String,
        expected: usize,
        found: usize,
    },

    /// An enumerated value named no known variant.
    #[error("unknown {kind} '{value}'")]
    UnknownVariant { value: String, kind: &'static str },
}

impl ConfigError {
    pub(crate) fn invalid(value: &str, kind: &'static str) -> Self {
        Self::InvalidValue {
            value: value.to_string(),
            kind,
        }
    }
}

/// Errors produced while building or linking an assembly.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("unknown part {0:?}")]
    UnknownPart(PartId),

    #[error("unknown attach point {0:?}")]
    UnknownAttachPoint(AttachPointId),

    #[error("attach point {point:?} does not belong to part {part:?}")]
    NotOwnedBy { point: AttachPointId, part: PartId },

    #[error("attach point '{0}' already has an attached part")]
    AlreadyAttached(String),

    #[error("part {0:?} has no surface attach point")]
    NoSurfaceAttachPoint(PartId),

    #[error("parenting {child:?} under {parent:?} would create a cycle")]
    Cycle { parent: PartId, child: PartId },
}
