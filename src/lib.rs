//! # DRE Report
//!
//! Income statement (DRE, *Demonstrativo de Resultado do Exercício*) aggregation
//! for business records, with period-over-period comparison.
//!
//! ## Core Concepts
//!
//! - **Period Window**: A concrete current `[start, end]` span plus the prior span it is
//!   compared against (calendar week/month/quarter/year, or a custom range)
//! - **Record Streams**: Settled sales (paid invoices) feed gross sales; income/expense
//!   transactions feed every other line through their category type
//! - **Period Totals**: Non-negative per-line sums for one window
//! - **Income Statement**: Revenue, deductions, costs, net result, margins and the
//!   comparison block, with every degenerate ratio resolved to `0`
//!
//! ## Example
//!
//! ```rust,ignore
//! use dre_report::*;
//! use chrono::NaiveDate;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2024, 5, d).unwrap().and_hms_opt(0, 0, 0).unwrap();
//!
//! let records = RecordSet::new(
//!     vec![SalesRecord::paid(1000.0, day(3))],
//!     vec![
//!         FinancialRecord::income("service", 500.0, day(5)),
//!         FinancialRecord::expense("tax", 100.0, day(6)),
//!         FinancialRecord::expense("salary", 300.0, day(8)),
//!     ],
//! );
//!
//! let engine = ReportEngine::new(InMemoryProvider::new(records), ReportConfig::new("ACME"));
//! let report = futures::executor::block_on(
//!     engine.generate(&ReportFilters::for_period(PeriodKind::Month), day(15)),
//! )?;
//!
//! println!("{}", StatementExport::from_report("DRE - ACME", &report).to_markdown());
//! ```

pub mod aggregator;
pub mod classifier;
pub mod engine;
pub mod error;
pub mod export;
pub mod ingestion;
pub mod period;
pub mod project;
pub mod provider;
pub mod schema;
pub mod statement;
pub mod utils;

pub use aggregator::{PeriodAggregator, PeriodTotals};
pub use classifier::{classify, classify_sale, Classifiable, LineBucket};
pub use engine::{build_report, DreReport, ReportEngine};
pub use error::{DreError, Result};
pub use export::{ExportRow, StatementExport, ValueUnit};
pub use ingestion::{records_from_json, sales_from_json};
pub use period::{resolve, resolve_with_week_start, DateRange, PeriodWindow};
pub use project::ProjectFinancialSummary;
pub use provider::{InMemoryProvider, ProjectScoped, RecordProvider, RecordQuery};
pub use schema::*;
pub use statement::{calculate, IncomeStatement, PeriodComparison};

use log::debug;

/// Aggregates `current` over `window`'s current span and, when given, `prior`
/// over its prior span, then derives the statement.
pub fn generate_income_statement(
    window: &PeriodWindow,
    current: &RecordSet,
    prior: Option<&RecordSet>,
) -> IncomeStatement {
    let current_totals = PeriodAggregator::aggregate(current, &window.current());
    let prior_totals = prior.map(|records| PeriodAggregator::aggregate(records, &window.prior()));

    debug!(
        "Computing statement for {} .. {} (comparison: {})",
        window.start,
        window.end,
        prior_totals.is_some()
    );

    calculate(&current_totals, prior_totals.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_end_to_end_statement() {
        let window = resolve(PeriodKind::Month, None, at(2024, 5, 15));
        let records = RecordSet::new(
            vec![SalesRecord::paid(1000.0, at(2024, 5, 3))],
            vec![
                FinancialRecord::income("service", 500.0, at(2024, 5, 5)),
                FinancialRecord::expense("tax", 100.0, at(2024, 5, 6)),
                FinancialRecord::expense("material", 200.0, at(2024, 5, 7)),
                FinancialRecord::expense("salary", 300.0, at(2024, 5, 8)),
            ],
        );

        let statement = generate_income_statement(&window, &records, None);

        assert_eq!(statement.gross_revenue, 1500.0);
        assert_eq!(statement.deductions, 100.0);
        assert_eq!(statement.net_revenue, 1400.0);
        assert_eq!(statement.total_costs_and_expenses, 500.0);
        assert_eq!(statement.net_result, 900.0);
        assert!((statement.gross_margin_pct - 93.3).abs() < 0.05);
        assert!((statement.net_margin_pct - 64.3).abs() < 0.05);
        assert!(statement.comparison.is_none());
    }

    #[test]
    fn test_records_outside_window_are_ignored() {
        let window = resolve(PeriodKind::Month, None, at(2024, 5, 15));
        let records = RecordSet::new(
            vec![SalesRecord::paid(1000.0, at(2024, 6, 1))],
            vec![FinancialRecord::income("service", 500.0, at(2024, 4, 30))],
        );

        let statement = generate_income_statement(&window, &records, Some(&records));
        assert_eq!(statement.gross_revenue, 0.0);

        let comparison = statement.comparison.unwrap();
        assert_eq!(comparison.gross_revenue_pct_change, -100.0);
    }
}
