use colored::Colorize;
use std::fmt;

/// Placeholder printed instead of values whose key names a password
pub const REDACTED: &str = "<redacted>";

/// True when values under `key` must never be printed
pub fn is_secret(key: &str) -> bool {
    key.to_lowercase().contains("password")
}

/// Failure returned by a visitor for a single leaf
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct VisitError {
    /// What the value should have looked like
    pub reason: String,
    /// The offending raw value, if one was read
    pub got: Option<String>,
}

impl VisitError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            got: None,
        }
    }

    pub fn with_value(reason: impl Into<String>, got: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            got: Some(got.into()),
        }
    }
}

/// A record declaration that cannot be traversed
///
/// These are programming mistakes, not bad input, so traversal panics with
/// them instead of collecting them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("field under {parent:?} has an empty environment key")]
    EmptyTag { parent: String },
    #[error("{key} is derived by more than one field")]
    DuplicateKey { key: String },
    #[error("{key} is an optional nested record that was not allocated before traversal")]
    MissingBranch { key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
struct Entry {
    key: String,
    reasons: Vec<String>,
    got: Option<String>,
}

/// Every invalid environment key found by a traversal, plus any extra
/// validation failures layered on afterwards with [`append`] and [`ensure`]
///
/// Each key appears once; further failures for the same key are appended
/// to its reasons. Entries keep the order they were first recorded in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TraversalError {
    entries: Vec<Entry>,
}

impl TraversalError {
    pub(crate) fn from_visit(key: &str, err: VisitError) -> Self {
        let mut errors = Self {
            entries: Vec::new(),
        };
        errors.record(key, err);
        errors
    }

    /// Values under secret keys are dropped here, so no rendering can leak them
    pub(crate) fn record(&mut self, key: &str, err: VisitError) {
        let got = if is_secret(key) { None } else { err.got };
        match self.entries.iter_mut().find(|entry| entry.key == key) {
            Some(entry) => {
                entry.reasons.push(err.reason);
                if entry.got.is_none() {
                    entry.got = got;
                }
            }
            None => self.entries.push(Entry {
                key: key.to_string(),
                reasons: vec![err.reason],
                got,
            }),
        }
    }

    /// Mark `key` invalid with `message`, keeping any earlier reasons
    pub fn append(&mut self, key: &str, message: impl Into<String>) {
        self.record(key, VisitError::new(message));
    }

    /// False if anything was recorded against `key`
    pub fn is_valid(&self, key: &str) -> bool {
        !self.entries.iter().any(|entry| entry.key == key)
    }

    /// Reasons recorded against `key`, oldest first
    pub fn reasons(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| entry.reasons.as_slice())
    }

    /// Invalid keys in the order they were first recorded
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for TraversalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Invalid environment variables ({}):",
            self.entries.len().to_string().yellow().bold()
        )?;
        for entry in &self.entries {
            write!(
                f,
                "  {} {}",
                entry.key.magenta().bold(),
                entry.reasons.join(": ")
            )?;
            if let Some(got) = &entry.got {
                write!(f, ": got {}", format!("\"{}\"", got).red())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl std::error::Error for TraversalError {}

/// Mark `key` invalid, creating the error if `result` held none
///
/// Used after loading to report semantic checks ("must be positive")
/// alongside the type errors the loader found.
pub fn append(
    result: Result<(), TraversalError>,
    key: &str,
    message: impl Into<String>,
) -> TraversalError {
    match result {
        Ok(()) => TraversalError::from_visit(key, VisitError::new(message)),
        Err(mut errors) => {
            errors.append(key, message);
            errors
        }
    }
}

/// Pass `result` through untouched when `holds`, otherwise [`append`]
pub fn ensure(
    result: Result<(), TraversalError>,
    key: &str,
    holds: bool,
    message: impl Into<String>,
) -> Result<(), TraversalError> {
    if holds {
        result
    } else {
        Err(append(result, key, message))
    }
}

/// Key queries on a traversal result, where `Ok` means nothing failed
pub trait Validity {
    fn is_valid(&self, key: &str) -> bool;
}

impl Validity for Result<(), TraversalError> {
    fn is_valid(&self, key: &str) -> bool {
        match self {
            Ok(()) => true,
            Err(errors) => errors.is_valid(key),
        }
    }
}
