use crate::aggregator::{PeriodAggregator, PeriodTotals};
use crate::error::Result;
use crate::period::{resolve_with_week_start, PeriodWindow};
use crate::provider::{RecordProvider, RecordQuery};
use crate::schema::{RecordSet, ReportConfig, ReportFilters};
use crate::statement::{calculate, IncomeStatement};
use chrono::NaiveDateTime;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Everything one report computation produced: the filters it ran with, the
/// resolved windows, both windows' totals and the derived statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DreReport {
    pub filters: ReportFilters,
    pub window: PeriodWindow,
    pub current: PeriodTotals,
    pub prior: PeriodTotals,
    pub statement: IncomeStatement,
}

pub struct ReportEngine<P> {
    provider: P,
    config: ReportConfig,
}

impl<P: RecordProvider> ReportEngine<P> {
    pub fn new(provider: P, config: ReportConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    pub fn resolve_window(&self, filters: &ReportFilters, now: NaiveDateTime) -> PeriodWindow {
        resolve_with_week_start(
            filters.period,
            filters.custom_range.as_ref(),
            now,
            self.config.first_day_of_week.to_weekday(),
        )
    }

    /// Fetches both windows concurrently and builds the report. If either
    /// fetch fails the error is returned and no report is produced.
    pub async fn generate(&self, filters: &ReportFilters, now: NaiveDateTime) -> Result<DreReport> {
        let window = self.resolve_window(filters, now);

        info!(
            "Generating DRE for {} ({:?}): {} .. {} vs {} .. {}",
            self.config.organization_name,
            filters.period,
            window.start,
            window.end,
            window.prior_start,
            window.prior_end
        );

        let (current_records, prior_records) = futures::try_join!(
            self.provider
                .fetch(RecordQuery::new(window.current(), filters.clone())),
            self.provider
                .fetch(RecordQuery::new(window.prior(), filters.clone())),
        )?;

        Ok(build_report(
            filters.clone(),
            window,
            &current_records,
            &prior_records,
        ))
    }

    pub async fn generate_default(&self, now: NaiveDateTime) -> Result<DreReport> {
        let filters = self.config.default_filters.clone();
        self.generate(&filters, now).await
    }
}

/// Aggregates already-fetched records for both windows and derives the
/// statement. Pure; usable by callers that do their own fetching.
pub fn build_report(
    filters: ReportFilters,
    window: PeriodWindow,
    current_records: &RecordSet,
    prior_records: &RecordSet,
) -> DreReport {
    let current = PeriodAggregator::aggregate(current_records, &window.current());
    let prior = PeriodAggregator::aggregate(prior_records, &window.prior());
    let statement = calculate(&current, Some(&prior));

    debug!(
        "DRE net result {:.2} (prior {:.2}), net margin {:.2}%",
        statement.net_result,
        prior.net_result(),
        statement.net_margin_pct
    );

    DreReport {
        filters,
        window,
        current,
        prior,
        statement,
    }
}
