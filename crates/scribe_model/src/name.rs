use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// -----------------------------------------------------------------------------
// Mangling constants

/// Suffix appended to a type's identifier to form its generated adapter name.
///
/// The adapter for `media.video.Clip` is `media.video.ClipAdapter`.
pub const ADAPTER_SUFFIX: &str = "Adapter";

/// Identifier of the generated per-package adapter factory.
///
/// The factory for package `media.video` is `media.video.AdapterFactory`.
pub const FACTORY_IDENT: &str = "AdapterFactory";

// -----------------------------------------------------------------------------
// Error

/// A dot-separated name failed validation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseNameError {
    #[error("qualified name is empty")]
    Empty,

    #[error("name `{0}` contains an empty segment")]
    EmptySegment(String),

    #[error("segment `{segment}` of `{name}` is not a valid identifier")]
    InvalidSegment { name: String, segment: String },
}

fn validate_segment(name: &str, segment: &str) -> Result<(), ParseNameError> {
    if segment.is_empty() {
        return Err(ParseNameError::EmptySegment(name.to_owned()));
    }

    let mut chars = segment.chars();
    let head_ok = chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_');

    if !head_ok || !chars.all(|c| c.is_alphanumeric() || c == '_') {
        return Err(ParseNameError::InvalidSegment {
            name: name.to_owned(),
            segment: segment.to_owned(),
        });
    }

    Ok(())
}

fn validate_segments(name: &str) -> Result<(), ParseNameError> {
    for segment in name.split('.') {
        validate_segment(name, segment)?;
    }
    Ok(())
}

// -----------------------------------------------------------------------------
// QualifiedName

/// A validated, dot-separated qualified type name, e.g. `media.video.Clip`.
///
/// The final segment is the type's [identifier](QualifiedName::ident); the
/// leading segments form its declaring [package](QualifiedName::package). A
/// bare name like `Clip` declares its type in the root package.
///
/// # Examples
///
/// ```
/// use scribe_model::QualifiedName;
///
/// let name = QualifiedName::parse("media.video.Clip").unwrap();
/// assert_eq!(name.ident(), "Clip");
/// assert_eq!(name.package().as_str(), "media.video");
/// assert_eq!(name.adapter_name().as_str(), "media.video.ClipAdapter");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedName(String);

impl QualifiedName {
    /// Parses and validates a dot-separated name.
    ///
    /// Every segment must be a non-empty identifier (alphabetic or `_`
    /// start, alphanumeric or `_` continuation).
    pub fn parse(name: &str) -> Result<Self, ParseNameError> {
        if name.is_empty() {
            return Err(ParseNameError::Empty);
        }
        validate_segments(name)?;
        Ok(Self(name.to_owned()))
    }

    /// The full dotted name.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The final segment: the type identifier without its package.
    #[inline]
    pub fn ident(&self) -> &str {
        match self.0.rfind('.') {
            Some(dot) => &self.0[dot + 1..],
            None => &self.0,
        }
    }

    /// The declaring package: all segments before the identifier.
    ///
    /// Bare names report the root package.
    #[inline]
    pub fn package(&self) -> PackagePath {
        match self.0.rfind('.') {
            Some(dot) => PackagePath(self.0[..dot].to_owned()),
            None => PackagePath::root(),
        }
    }

    /// The qualified name of this type's generated adapter.
    ///
    /// Same package, [`ADAPTER_SUFFIX`] appended to the identifier. The rule
    /// is deterministic: callers on both sides of a build boundary compute
    /// the same adapter name from the same type name.
    #[inline]
    pub fn adapter_name(&self) -> QualifiedName {
        QualifiedName(format!("{}{ADAPTER_SUFFIX}", self.0))
    }

    /// Iterates the name's segments in order.
    #[inline]
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for QualifiedName {
    type Err = ParseNameError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = ParseNameError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<QualifiedName> for String {
    #[inline]
    fn from(value: QualifiedName) -> Self {
        value.0
    }
}

// -----------------------------------------------------------------------------
// PackagePath

/// A validated, dot-separated package path, e.g. `media.video`.
///
/// The empty path is the root package. Package identity is the cheap runtime
/// key the generated registry dispatches on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackagePath(String);

impl PackagePath {
    /// The root package (no segments).
    #[inline]
    pub const fn root() -> Self {
        Self(String::new())
    }

    /// Parses and validates a dot-separated package path.
    ///
    /// The empty string parses to the root package.
    pub fn parse(path: &str) -> Result<Self, ParseNameError> {
        if !path.is_empty() {
            validate_segments(path)?;
        }
        Ok(Self(path.to_owned()))
    }

    /// The full dotted path; empty for the root package.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the root package.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends an identifier segment, forming a qualified name.
    pub fn join(&self, ident: &str) -> Result<QualifiedName, ParseNameError> {
        validate_segment(ident, ident)?;
        Ok(if self.is_root() {
            QualifiedName(ident.to_owned())
        } else {
            QualifiedName(format!("{}.{ident}", self.0))
        })
    }

    /// The qualified name of this package's generated adapter factory.
    ///
    /// Same package, [`FACTORY_IDENT`] as the identifier.
    ///
    /// # Examples
    ///
    /// ```
    /// use scribe_model::PackagePath;
    ///
    /// let pkg = PackagePath::parse("media.video").unwrap();
    /// assert_eq!(pkg.factory_name().as_str(), "media.video.AdapterFactory");
    /// ```
    #[inline]
    pub fn factory_name(&self) -> QualifiedName {
        if self.is_root() {
            QualifiedName(FACTORY_IDENT.to_owned())
        } else {
            QualifiedName(format!("{}.{FACTORY_IDENT}", self.0))
        }
    }

    /// Iterates the path's segments in order; empty for the root package.
    #[inline]
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|s| !s.is_empty())
    }
}

impl fmt::Display for PackagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PackagePath {
    type Err = ParseNameError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PackagePath {
    type Error = ParseNameError;

    #[inline]
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PackagePath> for String {
    #[inline]
    fn from(value: PackagePath) -> Self {
        value.0
    }
}

// -----------------------------------------------------------------------------
// Tests
