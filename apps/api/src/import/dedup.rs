use std::collections::HashSet;

use crate::models::application::ExistingApplication;

/// Composite key used to detect an already-tracked application.
pub fn dedup_key(company: &str, position: &str) -> String {
    format!("{}-{}", company.to_lowercase(), position.to_lowercase())
}

/// Key set for one import run. Keys are only ever added, so an earlier row
/// suppresses a later duplicate in the same file.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: HashSet<String>,
}

impl Deduplicator {
    pub fn seeded<'a, I>(existing: I) -> Self
    where
        I: IntoIterator<Item = &'a ExistingApplication>,
    {
        let seen = existing
            .into_iter()
            .map(|app| dedup_key(&app.company_name, &app.position))
            .collect();
        Self { seen }
    }

    /// Returns `true` and records the key if it has not been seen yet.
    pub fn admit(&mut self, company: &str, position: &str) -> bool {
        self.seen.insert(dedup_key(company, position))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing(company: &str, position: &str) -> ExistingApplication {
        ExistingApplication {
            company_name: company.to_string(),
            position: position.to_string(),
        }
    }

    #[test]
    fn test_key_is_lowercased() {
        assert_eq!(dedup_key("Acme Corp", "SRE"), "acme corp-sre");
    }

    #[test]
    fn test_existing_records_are_rejected() {
        let snapshot = vec![existing("Acme", "Engineer")];
        let mut dedup = Deduplicator::seeded(&snapshot);
        assert!(!dedup.admit("ACME", "engineer"));
        assert!(dedup.admit("Acme", "Designer"));
    }

    #[test]
    fn test_in_batch_duplicate_is_rejected() {
        let mut dedup = Deduplicator::default();
        assert!(dedup.admit("Globex", "Analyst"));
        assert!(!dedup.admit("globex", "ANALYST"));
        assert_eq!(dedup.len(), 1);
    }

    #[test]
    fn test_set_never_shrinks() {
        let snapshot = vec![existing("A", "B"), existing("a", "b")];
        let mut dedup = Deduplicator::seeded(&snapshot);
        assert_eq!(dedup.len(), 1);
        dedup.admit("C", "D");
        dedup.admit("C", "D");
        assert_eq!(dedup.len(), 2);
    }
}
