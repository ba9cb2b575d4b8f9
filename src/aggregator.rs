use crate::classifier::{Classifiable, LineBucket};
use crate::period::DateRange;
use crate::schema::RecordSet;
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Per-line sums for one window. Every field holds a non-negative magnitude;
/// signs are applied by the statement calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PeriodTotals {
    pub gross_sales: f64,
    pub service_revenue: f64,
    pub other_revenue: f64,
    pub tax_deductions: f64,
    pub refund_deductions: f64,
    pub direct_costs: f64,
    pub operating_expenses: f64,
    pub financial_expenses: f64,
}

impl PeriodTotals {
    pub fn get(&self, bucket: LineBucket) -> f64 {
        match bucket {
            LineBucket::GrossSales => self.gross_sales,
            LineBucket::ServiceRevenue => self.service_revenue,
            LineBucket::OtherRevenue => self.other_revenue,
            LineBucket::TaxDeductions => self.tax_deductions,
            LineBucket::RefundDeductions => self.refund_deductions,
            LineBucket::DirectCosts => self.direct_costs,
            LineBucket::OperatingExpenses => self.operating_expenses,
            LineBucket::FinancialExpenses => self.financial_expenses,
        }
    }

    fn slot_mut(&mut self, bucket: LineBucket) -> &mut f64 {
        match bucket {
            LineBucket::GrossSales => &mut self.gross_sales,
            LineBucket::ServiceRevenue => &mut self.service_revenue,
            LineBucket::OtherRevenue => &mut self.other_revenue,
            LineBucket::TaxDeductions => &mut self.tax_deductions,
            LineBucket::RefundDeductions => &mut self.refund_deductions,
            LineBucket::DirectCosts => &mut self.direct_costs,
            LineBucket::OperatingExpenses => &mut self.operating_expenses,
            LineBucket::FinancialExpenses => &mut self.financial_expenses,
        }
    }

    /// Accumulates the magnitude of `amount` into `bucket`.
    pub fn record(&mut self, bucket: LineBucket, amount: f64) {
        *self.slot_mut(bucket) += amount.abs();
    }

    pub fn gross_revenue(&self) -> f64 {
        self.gross_sales + self.service_revenue + self.other_revenue
    }

    pub fn deductions(&self) -> f64 {
        self.tax_deductions + self.refund_deductions
    }

    pub fn net_revenue(&self) -> f64 {
        self.gross_revenue() - self.deductions()
    }

    pub fn total_costs_and_expenses(&self) -> f64 {
        self.direct_costs + self.operating_expenses + self.financial_expenses
    }

    pub fn net_result(&self) -> f64 {
        self.net_revenue() - self.total_costs_and_expenses()
    }
}

impl AddAssign for PeriodTotals {
    fn add_assign(&mut self, other: Self) {
        for bucket in LineBucket::ALL {
            *self.slot_mut(bucket) += other.get(bucket);
        }
    }
}

impl Add for PeriodTotals {
    type Output = PeriodTotals;

    fn add(mut self, other: Self) -> Self::Output {
        self += other;
        self
    }
}

impl Sum for PeriodTotals {
    fn sum<I: Iterator<Item = PeriodTotals>>(iter: I) -> Self {
        iter.fold(PeriodTotals::default(), |acc, t| acc + t)
    }
}

pub struct PeriodAggregator;

impl PeriodAggregator {
    /// Sums both record streams of `records` that fall inside `range`.
    pub fn aggregate(records: &RecordSet, range: &DateRange) -> PeriodTotals {
        let mut totals = PeriodTotals::default();
        Self::accumulate(&mut totals, &records.sales, range);
        Self::accumulate(&mut totals, &records.transactions, range);

        debug!(
            "Aggregated {} records for {} .. {}: gross revenue {:.2}, net result {:.2}",
            records.len(),
            range.start,
            range.end,
            totals.gross_revenue(),
            totals.net_result()
        );

        totals
    }

    pub fn aggregate_records<R: Classifiable>(records: &[R], range: &DateRange) -> PeriodTotals {
        let mut totals = PeriodTotals::default();
        Self::accumulate(&mut totals, records, range);
        totals
    }

    fn accumulate<R: Classifiable>(totals: &mut PeriodTotals, records: &[R], range: &DateRange) {
        for record in records {
            if !range.contains(record.occurred_at()) {
                continue;
            }

            match record.bucket() {
                Some(bucket) => totals.record(bucket, record.amount()),
                None => debug!(
                    "Skipping unclassified record of {:.2} on {}",
                    record.amount(),
                    record.occurred_at()
                ),
            }
        }
    }
}
