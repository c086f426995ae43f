//! Dangerous-object classification.
//!
//! A pure set-membership predicate over canonical labels. The set comes from
//! configuration and can be swapped at runtime; the classifier never caches
//! per-label results.

use std::collections::HashSet;

use crate::frame::canonical_label;

/// Default dangerous-object classes.
pub const DEFAULT_DANGEROUS_LABELS: &[&str] = &[
    "knife", "gun", "fire", "chainsaw", "smoke", "axe", "bomb", "sword", "grenade", "syringe",
    "hammer",
];

/// Classifies labels as dangerous by exact canonical-set membership.
///
/// No substring or synonym matching: "kitchen knife" is not "knife".
#[derive(Clone, Debug)]
pub struct DangerClassifier {
    labels: HashSet<String>,
}

impl DangerClassifier {
    /// Build from any label iterator; entries are canonicalized on the way in.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let labels = labels
            .into_iter()
            .map(|l| canonical_label(l.as_ref()))
            .filter(|l| !l.is_empty())
            .collect();
        Self { labels }
    }

    pub fn is_dangerous(&self, label: &str) -> bool {
        self.labels.contains(&canonical_label(label))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for DangerClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_DANGEROUS_LABELS.iter().copied())
    }
}
