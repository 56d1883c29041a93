use tracing::warn;

use crate::auth::GeographicScopeMatcher;
use crate::domain::{Located, Subject};

/// Batch size above which eager filtering is logged as oversized.
///
/// Eager filtering is linear in the batch; callers expecting more candidate
/// records than this should page through [`ScopeFilter::filter_iter`].
pub const DEFAULT_FILTER_BATCH_LIMIT: usize = 50_000;

/// Narrows a candidate record set to what a subject's jurisdiction permits.
#[derive(Debug, Clone, Copy)]
pub struct ScopeFilter {
    matcher: GeographicScopeMatcher,
    batch_limit: usize,
}

impl Default for ScopeFilter {
    fn default() -> Self {
        Self::new(GeographicScopeMatcher::default(), DEFAULT_FILTER_BATCH_LIMIT)
    }
}

impl ScopeFilter {
    pub fn new(matcher: GeographicScopeMatcher, batch_limit: usize) -> Self {
        Self {
            matcher,
            batch_limit,
        }
    }

    pub fn matcher(&self) -> &GeographicScopeMatcher {
        &self.matcher
    }

    pub fn batch_limit(&self) -> usize {
        self.batch_limit
    }

    pub fn is_visible<T: Located + ?Sized>(&self, subject: &Subject, record: &T) -> bool {
        subject.role.is_admin()
            || self
                .matcher
                .matches(subject.role, &subject.jurisdiction, record.location())
    }

    /// Records of `records` the subject may see, in input order.
    ///
    /// Returns references into the input, so retained records keep their
    /// identity. Admin gets every record back.
    pub fn filter_visible<'a, T: Located>(&self, subject: &Subject, records: &'a [T]) -> Vec<&'a T> {
        if records.len() > self.batch_limit {
            warn!(
                subject_id = %subject.id,
                batch = records.len(),
                limit = self.batch_limit,
                "scope filter batch exceeds configured limit"
            );
        }

        if subject.role.is_admin() {
            return records.iter().collect();
        }

        records
            .iter()
            .filter(|record| self.is_visible(subject, *record))
            .collect()
    }

    /// Lazy variant of [`filter_visible`](Self::filter_visible).
    ///
    /// Nothing is evaluated until the iterator is polled. When the source
    /// iterator is `Clone` the result is too, so a caller can restart it.
    pub fn filter_iter<'s, I>(
        &'s self,
        subject: &'s Subject,
        records: I,
    ) -> impl Iterator<Item = I::Item> + Clone + 's
    where
        I: IntoIterator + 's,
        I::IntoIter: Clone + 's,
        I::Item: Located,
    {
        records
            .into_iter()
            .filter(move |record| self.is_visible(subject, record))
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::domain::{ResourceLocation, Role};

    #[derive(Debug, PartialEq)]
    struct Record {
        id: &'static str,
        location: ResourceLocation,
    }

    impl Located for Record {
        fn location(&self) -> &ResourceLocation {
            &self.location
        }
    }

    fn records() -> Vec<Record> {
        vec![
            Record {
                id: "A",
                location: ResourceLocation::district("Odisha", "Mayurbhanj"),
            },
            Record {
                id: "B",
                location: ResourceLocation::district("MP", "Balaghat"),
            },
            Record {
                id: "C",
                location: ResourceLocation::district("Odisha", "Keonjhar"),
            },
        ]
    }

    fn ids(records: &[&Record]) -> Vec<&'static str> {
        records.iter().map(|record| record.id).collect()
    }

    #[test]
    fn test_state_admin_keeps_order() {
        let subject = Subject::new("s", Role::StateAdmin, ResourceLocation::state("Odisha"));
        let records = records();
        let visible = ScopeFilter::default().filter_visible(&subject, &records);
        assert_eq!(ids(&visible), vec!["A", "C"]);
    }

    #[test]
    fn test_admin_gets_same_records() {
        let subject = Subject::new("s", Role::Admin, ResourceLocation::default());
        let records = records();
        let visible = ScopeFilter::default().filter_visible(&subject, &records);
        assert_eq!(visible.len(), records.len());
        for (kept, original) in visible.iter().zip(records.iter()) {
            assert!(std::ptr::eq(*kept, original));
        }
    }

    #[test]
    fn test_filter_is_idempotent() {
        let subject = Subject::new(
            "s",
            Role::DistrictAdmin,
            ResourceLocation::district("Odisha", "Keonjhar"),
        );
        let filter = ScopeFilter::default();
        let records = records();
        let once = filter.filter_visible(&subject, &records);
        let twice = filter.filter_visible(&subject, &once);
        assert_eq!(ids(&once), vec!["C"]);
        assert_eq!(twice.into_iter().copied().collect::<Vec<_>>(), once);
    }

    #[test]
    fn test_filter_iter_is_lazy() {
        let subject = Subject::new("s", Role::StateAdmin, ResourceLocation::state("Odisha"));
        let filter = ScopeFilter::default();
        let records = records();
        let consumed = Cell::new(0);

        let visible = filter.filter_iter(
            &subject,
            records.iter().inspect(|_| consumed.set(consumed.get() + 1)),
        );
        assert_eq!(consumed.get(), 0);

        let first: Vec<&str> = visible.clone().take(1).map(|record| record.id).collect();
        assert_eq!(first, vec!["A"]);
        assert_eq!(consumed.get(), 1);

        let all: Vec<&str> = visible.map(|record| record.id).collect();
        assert_eq!(all, vec!["A", "C"]);
        assert_eq!(consumed.get(), 1 + records.len());
    }

    #[test]
    fn test_filter_iter_is_restartable() {
        let subject = Subject::new("s", Role::StateAdmin, ResourceLocation::state("Odisha"));
        let filter = ScopeFilter::default();
        let records = records();

        let visible = filter.filter_iter(&subject, records.iter());
        let first: Vec<&str> = visible.clone().map(|record| record.id).collect();
        let second: Vec<&str> = visible.map(|record| record.id).collect();
        assert_eq!(first, vec!["A", "C"]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_input() {
        let subject = Subject::new("s", Role::User, ResourceLocation::default());
        let records: Vec<Record> = Vec::new();
        assert!(ScopeFilter::default()
            .filter_visible(&subject, &records)
            .is_empty());
    }
}
