use crate::aggregator::PeriodTotals;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PeriodComparison {
    #[schemars(description = "Relative change of gross revenue against the prior window, in percent")]
    pub gross_revenue_pct_change: f64,

    #[schemars(
        description = "Change of net result relative to the magnitude of the prior net result, in percent"
    )]
    pub net_result_pct_change: f64,

    #[schemars(description = "Difference between current and prior net margin, in percentage points")]
    pub net_margin_pt_change: f64,
}

/// The computed DRE for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct IncomeStatement {
    pub lines: PeriodTotals,
    pub gross_revenue: f64,
    pub deductions: f64,
    pub net_revenue: f64,
    pub total_costs_and_expenses: f64,
    pub net_result: f64,

    /// Net revenue over gross revenue. Despite the name this is the share of
    /// revenue kept after deductions, not revenue minus cost of goods.
    pub gross_margin_pct: f64,

    pub net_margin_pct: f64,

    #[serde(default)]
    pub comparison: Option<PeriodComparison>,
}

/// Derives the statement for `current`, plus the comparison block when
/// `prior` is given. Degenerate denominators yield 0.
pub fn calculate(current: &PeriodTotals, prior: Option<&PeriodTotals>) -> IncomeStatement {
    let mut statement = summarize(current);
    statement.comparison = prior.map(|p| compare(&statement, &summarize(p)));
    statement
}

fn summarize(totals: &PeriodTotals) -> IncomeStatement {
    let gross_revenue = totals.gross_revenue();
    let deductions = totals.deductions();
    let net_revenue = gross_revenue - deductions;
    let total_costs_and_expenses = totals.total_costs_and_expenses();
    let net_result = net_revenue - total_costs_and_expenses;

    let (gross_margin_pct, net_margin_pct) = if net_revenue > 0.0 {
        (
            (net_revenue / gross_revenue) * 100.0,
            (net_result / net_revenue) * 100.0,
        )
    } else {
        (0.0, 0.0)
    };

    IncomeStatement {
        lines: *totals,
        gross_revenue,
        deductions,
        net_revenue,
        total_costs_and_expenses,
        net_result,
        gross_margin_pct,
        net_margin_pct,
        comparison: None,
    }
}

fn compare(current: &IncomeStatement, prior: &IncomeStatement) -> PeriodComparison {
    let gross_revenue_pct_change = if prior.gross_revenue > 0.0 {
        ((current.gross_revenue - prior.gross_revenue) / prior.gross_revenue) * 100.0
    } else {
        0.0
    };

    // Relative to the magnitude of the prior result: any improvement is positive.
    let net_result_pct_change = if prior.net_result != 0.0 {
        ((current.net_result - prior.net_result) / prior.net_result.abs()) * 100.0
    } else {
        0.0
    };

    PeriodComparison {
        gross_revenue_pct_change,
        net_result_pct_change,
        net_margin_pt_change: current.net_margin_pct - prior.net_margin_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_totals() -> PeriodTotals {
        PeriodTotals {
            gross_sales: 1000.0,
            service_revenue: 500.0,
            tax_deductions: 100.0,
            direct_costs: 200.0,
            operating_expenses: 300.0,
            ..PeriodTotals::default()
        }
    }

    #[test]
    fn test_statement_fields() {
        let statement = calculate(&sample_totals(), None);

        assert_eq!(statement.gross_revenue, 1500.0);
        assert_eq!(statement.deductions, 100.0);
        assert_eq!(statement.net_revenue, 1400.0);
        assert_eq!(statement.total_costs_and_expenses, 500.0);
        assert_eq!(statement.net_result, 900.0);
        assert!((statement.gross_margin_pct - 93.333_333).abs() < 1e-4);
        assert!((statement.net_margin_pct - 64.285_714).abs() < 1e-4);
        assert!(statement.comparison.is_none());
    }

    #[test]
    fn test_zero_net_revenue_gives_zero_margins() {
        let totals = PeriodTotals {
            gross_sales: 100.0,
            tax_deductions: 100.0,
            operating_expenses: 50.0,
            ..PeriodTotals::default()
        };
        let statement = calculate(&totals, None);

        assert_eq!(statement.net_revenue, 0.0);
        assert_eq!(statement.gross_margin_pct, 0.0);
        assert_eq!(statement.net_margin_pct, 0.0);

        let empty = calculate(&PeriodTotals::default(), None);
        assert_eq!(empty.gross_margin_pct, 0.0);
        assert_eq!(empty.net_margin_pct, 0.0);
    }

    #[test]
    fn test_negative_net_revenue_gives_zero_margins() {
        let totals = PeriodTotals {
            gross_sales: 100.0,
            refund_deductions: 150.0,
            ..PeriodTotals::default()
        };
        let statement = calculate(&totals, None);
        assert_eq!(statement.net_revenue, -50.0);
        assert_eq!(statement.gross_margin_pct, 0.0);
        assert_eq!(statement.net_margin_pct, 0.0);
    }

    #[test]
    fn test_comparison_from_loss_to_profit() {
        // prior net result = -100, current = 50
        let prior = PeriodTotals {
            service_revenue: 100.0,
            operating_expenses: 200.0,
            ..PeriodTotals::default()
        };
        let current = PeriodTotals {
            service_revenue: 100.0,
            operating_expenses: 50.0,
            ..PeriodTotals::default()
        };

        let comparison = calculate(&current, Some(&prior)).comparison.unwrap();
        assert_eq!(comparison.net_result_pct_change, 150.0);
        assert_eq!(comparison.gross_revenue_pct_change, 0.0);
        // current margin 50%, prior margin -100%
        assert_eq!(comparison.net_margin_pt_change, 150.0);
    }

    #[test]
    fn test_comparison_with_empty_prior_degrades_to_zero() {
        let comparison = calculate(&sample_totals(), Some(&PeriodTotals::default()))
            .comparison
            .unwrap();

        assert_eq!(comparison.gross_revenue_pct_change, 0.0);
        assert_eq!(comparison.net_result_pct_change, 0.0);
        assert!((comparison.net_margin_pt_change - 64.285_714).abs() < 1e-4);
    }

    #[test]
    fn test_gross_revenue_growth() {
        let prior = PeriodTotals {
            gross_sales: 1000.0,
            ..PeriodTotals::default()
        };
        let current = PeriodTotals {
            gross_sales: 1250.0,
            ..PeriodTotals::default()
        };

        let comparison = calculate(&current, Some(&prior)).comparison.unwrap();
        assert_eq!(comparison.gross_revenue_pct_change, 25.0);
        assert_eq!(comparison.net_result_pct_change, 25.0);
        assert_eq!(comparison.net_margin_pt_change, 0.0);
    }

    #[test]
    fn test_calculate_is_deterministic() {
        let prior = PeriodTotals {
            gross_sales: 777.7,
            other_revenue: 0.1,
            financial_expenses: 3.3,
            ..PeriodTotals::default()
        };
        let first = calculate(&sample_totals(), Some(&prior));
        let second = calculate(&sample_totals(), Some(&prior));

        assert_eq!(first, second);
        assert_eq!(
            first.net_margin_pct.to_bits(),
            second.net_margin_pct.to_bits()
        );
    }
}
