use crate::error::Result;
use crate::period::DateRange;
use crate::schema::{RecordSet, ReportFilters};
use futures::future::{self, Future};

/// One fetch request: a window plus the filter selection to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordQuery {
    pub range: DateRange,
    pub filters: ReportFilters,
}

impl RecordQuery {
    pub fn new(range: DateRange, filters: ReportFilters) -> Self {
        Self { range, filters }
    }
}

/// Source of records for a window. Implementations wrap the data service;
/// a failed fetch is reported as `DreError::FetchError`.
pub trait RecordProvider {
    fn fetch(&self, query: RecordQuery) -> impl Future<Output = Result<RecordSet>> + Send;
}

/// Serves records already held in memory, applying filters and window bounds
/// the way the data service would.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    records: RecordSet,
}

impl InMemoryProvider {
    pub fn new(records: RecordSet) -> Self {
        Self { records }
    }

    pub fn select(&self, query: &RecordQuery) -> RecordSet {
        let mut selected = self.records.filtered(&query.filters);
        selected.sales.retain(|s| query.range.contains(s.date));
        selected
            .transactions
            .retain(|t| query.range.contains(t.date));
        selected
    }
}

impl RecordProvider for InMemoryProvider {
    fn fetch(&self, query: RecordQuery) -> impl Future<Output = Result<RecordSet>> + Send {
        future::ready(Ok(self.select(&query)))
    }
}

/// Pins every query of the wrapped provider to a single project, so the
/// per-project DRE runs through the same engine as the company-wide one.
#[derive(Debug, Clone)]
pub struct ProjectScoped<P> {
    inner: P,
    project_id: String,
}

impl<P> ProjectScoped<P> {
    pub fn new(inner: P, project_id: impl Into<String>) -> Self {
        Self {
            inner,
            project_id: project_id.into(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }
}

impl<P: RecordProvider> RecordProvider for ProjectScoped<P> {
    fn fetch(&self, mut query: RecordQuery) -> impl Future<Output = Result<RecordSet>> + Send {
        query.filters.project_id = Some(self.project_id.clone());
        self.inner.fetch(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FinancialRecord, SalesRecord};
    use chrono::{NaiveDate, NaiveDateTime};
    use futures::executor::block_on;

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn provider() -> InMemoryProvider {
        InMemoryProvider::new(RecordSet::new(
            vec![
                SalesRecord::paid(1000.0, at(2024, 5, 3)).with_project("alpha"),
                SalesRecord::paid(400.0, at(2024, 5, 4)).with_project("beta"),
                SalesRecord::paid(50.0, at(2024, 4, 4)).with_project("alpha"),
            ],
            vec![
                FinancialRecord::expense("salary", 300.0, at(2024, 5, 8)).with_project("alpha"),
                FinancialRecord::expense("rent", 100.0, at(2024, 5, 8)),
            ],
        ))
    }

    #[test]
    fn test_in_memory_provider_applies_window() {
        let query = RecordQuery::new(
            DateRange::new(at(2024, 5, 1), at(2024, 5, 31)),
            ReportFilters::default(),
        );

        let set = block_on(provider().fetch(query)).unwrap();
        assert_eq!(set.sales.len(), 2);
        assert_eq!(set.transactions.len(), 2);
    }

    #[test]
    fn test_project_scope_overrides_filters() {
        let scoped = ProjectScoped::new(provider(), "alpha");
        let query = RecordQuery::new(
            DateRange::new(at(2024, 5, 1), at(2024, 5, 31)),
            ReportFilters::default().with_project("beta"),
        );

        let set = block_on(scoped.fetch(query)).unwrap();
        assert_eq!(scoped.project_id(), "alpha");
        assert_eq!(set.sales.len(), 1);
        assert_eq!(set.sales[0].amount, 1000.0);
        assert_eq!(set.transactions.len(), 1);
        assert_eq!(set.transactions[0].category_type, "salary");
    }
}
