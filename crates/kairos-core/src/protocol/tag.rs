//! Tag validation and the ordered tag set.
//!
//! Tag names and values may only contain ASCII alphanumerics, `.`, `-`,
//! `_` and `/`. Validation happens when a tag enters a [`TagSet`], so a set
//! that exists is always safe to write.

use crate::error::{KairosError, Result};

fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '/')
}

/// Validate a single tag name or value.
pub fn validate_tag(tag: &str) -> Result<()> {
    if tag.is_empty() || !tag.chars().all(is_tag_char) {
        return Err(KairosError::InvalidTag(tag.to_string()));
    }
    Ok(())
}

/// Insertion-ordered set of validated tags.
///
/// Re-inserting a name replaces its value in place, keeping the original
/// position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet {
    tags: Vec<(String, String)>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and insert a tag.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let name = name.into();
        let value = value.into();
        validate_tag(&name)?;
        validate_tag(&value)?;

        match self.tags.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.tags.push((name, value)),
        }
        Ok(())
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        self.insert(name, value)?;
        Ok(self)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.tags.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Build a set from pairs, failing on the first invalid tag.
    pub fn try_from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut set = Self::new();
        for (k, v) in pairs {
            set.insert(k, v)?;
        }
        Ok(set)
    }
}
