#![forbid(unsafe_code)]

//! Section identifiers, visibility samples, and the document-ordered registry.
//!
//! A section is a named scrollable region of the page. The registry records
//! the sections the page declares, in document order, and is the single
//! authority on which ids navigation may target and how observer entries
//! are ordered.

use std::fmt;

/// Stable identifier of a page section (the element `id` attribute).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectionId(String);

impl SectionId {
    /// Wrap a raw identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve an anchor `href` of the form `#<id>`.
    ///
    /// Returns `None` for hrefs that do not point at an in-page fragment or
    /// that carry an empty fragment.
    #[must_use]
    pub fn from_href(href: &str) -> Option<Self> {
        let fragment = href.trim().strip_prefix('#')?;
        if fragment.is_empty() {
            return None;
        }
        Some(Self::new(fragment))
    }

    /// The `#<id>` anchor form of this identifier.
    #[must_use]
    pub fn href(&self) -> String {
        format!("#{}", self.0)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SectionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One per-section visibility reading delivered by the visibility observer.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilitySample {
    pub id: SectionId,
    /// Visible fraction of the section, always within `[0, 1]`.
    pub ratio: f64,
    pub intersecting: bool,
}

impl VisibilitySample {
    /// Build a sample, clamping `ratio` into `[0, 1]` (NaN becomes `0`).
    #[must_use]
    pub fn new(id: impl Into<SectionId>, ratio: f64, intersecting: bool) -> Self {
        Self {
            id: id.into(),
            ratio: clamp_ratio(ratio),
            intersecting,
        }
    }
}

/// Clamp an observer ratio into `[0, 1]`.
#[must_use]
pub fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

/// Error raised while building a [`SectionRegistry`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionRegistryError {
    /// A section had an empty identifier.
    EmptyId { position: usize },
    /// The same identifier appeared twice.
    DuplicateId(SectionId),
}

impl fmt::Display for SectionRegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId { position } => write!(f, "section at position {position} has an empty id"),
            Self::DuplicateId(id) => write!(f, "duplicate section id: {id}"),
        }
    }
}

impl std::error::Error for SectionRegistryError {}

/// Known sections in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionRegistry {
    sections: Vec<SectionId>,
}

impl SectionRegistry {
    /// Build a registry from ids listed in document order.
    pub fn new<I, S>(ids: I) -> Result<Self, SectionRegistryError>
    where
        I: IntoIterator<Item = S>,
        S: Into<SectionId>,
    {
        let mut sections: Vec<SectionId> = Vec::new();
        for (position, id) in ids.into_iter().enumerate() {
            let id = id.into();
            if id.as_str().is_empty() {
                return Err(SectionRegistryError::EmptyId { position });
            }
            if sections.contains(&id) {
                return Err(SectionRegistryError::DuplicateId(id));
            }
            sections.push(id);
        }
        Ok(Self { sections })
    }

    /// Number of registered sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Whether `id` is a registered section.
    #[must_use]
    pub fn contains(&self, id: &SectionId) -> bool {
        self.position(id).is_some()
    }

    /// Document-order index of `id`.
    #[must_use]
    pub fn position(&self, id: &SectionId) -> Option<usize> {
        self.sections.iter().position(|known| known == id)
    }

    /// First section in document order.
    #[must_use]
    pub fn first(&self) -> Option<&SectionId> {
        self.sections.first()
    }

    /// Iterate sections in document order.
    pub fn iter(&self) -> impl Iterator<Item = &SectionId> {
        self.sections.iter()
    }
}
