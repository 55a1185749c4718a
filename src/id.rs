use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

const SUFFIX_BOUND: u32 = 1_000_000;

/// Stable key of a record inside an identifier-keyed collection.
///
/// Generated ids have the shape `<section tag>-<unix millis>-<suffix>`.
/// Ids loaded from persisted data or from the built-in default
/// (e.g. `cert-1`) are kept verbatim.
#[derive(
    Eq, PartialEq, Ord, PartialOrd, Hash, Clone, Debug, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Compose a fresh id for a record created in section `tag`.
    pub fn generate(tag: &str) -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        let suffix = fastrand::u32(..SUFFIX_BOUND);
        let id = Self(format!("{tag}-{millis}-{suffix}"));
        log::trace!("generated record id {}", id);
        id
    }

    /// Generate ids until one is not claimed by `taken`.
    pub fn generate_unique<'a, I>(tag: &str, taken: I) -> Self
    where
        I: IntoIterator<Item = &'a RecordId> + Clone,
    {
        loop {
            let candidate = Self::generate(tag);
            if !taken.clone().into_iter().any(|id| *id == candidate) {
                return candidate;
            }
            log::debug!("record id {} collided, regenerating", candidate);
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Section tag of a generated id, if the id has the generated shape.
    pub fn section_tag(&self) -> Option<&str> {
        let mut parts = self.0.rsplitn(3, '-');
        let suffix = parts.next()?;
        let millis = parts.next()?;
        let tag = parts.next()?;
        let numeric = |s: &str| {
            !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
        };
        (numeric(suffix) && numeric(millis) && !tag.is_empty()).then_some(tag)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_carry_section_tag() {
        let id = RecordId::generate("portfolioItems");
        assert!(id.as_str().starts_with("portfolioItems-"));
        assert_eq!(id.section_tag(), Some("portfolioItems"));
    }

    #[rstest]
    #[case("cert-1", None)]
    #[case("exp-4", None)]
    #[case("experience-1718000000000-42", Some("experience"))]
    #[case("plain", None)]
    fn section_tag_of_known_ids(
        #[case] raw: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(RecordId::from(raw).section_tag(), expected);
    }

    #[test]
    fn unique_generation_avoids_taken_ids() {
        let mut taken: Vec<RecordId> = Vec::new();
        for _ in 0..500 {
            let id = RecordId::generate_unique("education", taken.iter());
            assert!(!taken.contains(&id));
            taken.push(id);
        }
        let distinct: HashSet<_> = taken.iter().collect();
        assert_eq!(distinct.len(), taken.len());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = RecordId::from("cert-7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"cert-7\"");
    }
}
