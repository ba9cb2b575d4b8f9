use crate::schema::{FinancialRecord, RecordKind, SaleStatus, SalesRecord};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Income statement line a record accumulates into. Declaration order is the
/// order lines appear on the statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineBucket {
    GrossSales,
    ServiceRevenue,
    OtherRevenue,
    TaxDeductions,
    RefundDeductions,
    DirectCosts,
    OperatingExpenses,
    FinancialExpenses,
}

impl LineBucket {
    pub const ALL: [LineBucket; 8] = [
        LineBucket::GrossSales,
        LineBucket::ServiceRevenue,
        LineBucket::OtherRevenue,
        LineBucket::TaxDeductions,
        LineBucket::RefundDeductions,
        LineBucket::DirectCosts,
        LineBucket::OperatingExpenses,
        LineBucket::FinancialExpenses,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LineBucket::GrossSales => "Gross sales",
            LineBucket::ServiceRevenue => "Service revenue",
            LineBucket::OtherRevenue => "Other revenue",
            LineBucket::TaxDeductions => "Taxes on sales",
            LineBucket::RefundDeductions => "Refunds and returns",
            LineBucket::DirectCosts => "Direct costs",
            LineBucket::OperatingExpenses => "Operating expenses",
            LineBucket::FinancialExpenses => "Financial expenses",
        }
    }

    pub fn is_revenue(self) -> bool {
        matches!(
            self,
            LineBucket::GrossSales | LineBucket::ServiceRevenue | LineBucket::OtherRevenue
        )
    }

    pub fn is_deduction(self) -> bool {
        matches!(
            self,
            LineBucket::TaxDeductions | LineBucket::RefundDeductions
        )
    }
}

const OPERATING_EXPENSE_TYPES: [&str; 4] = ["operational", "salary", "rent", "marketing"];

/// Maps a transaction's kind and category type to its statement line.
/// `None` means unclassified: the record is left out of every total.
///
/// Income tagged `"revenue"` is unclassified on purpose; sales revenue comes
/// from the settled-sales stream only.
pub fn classify(kind: RecordKind, category_type: &str) -> Option<LineBucket> {
    match kind {
        RecordKind::Income => match category_type {
            "service" => Some(LineBucket::ServiceRevenue),
            "revenue" => None,
            _ => Some(LineBucket::OtherRevenue),
        },
        RecordKind::Expense => match category_type {
            "tax" => Some(LineBucket::TaxDeductions),
            "refund" => Some(LineBucket::RefundDeductions),
            "material" => Some(LineBucket::DirectCosts),
            "financial" => Some(LineBucket::FinancialExpenses),
            t if OPERATING_EXPENSE_TYPES.contains(&t) => Some(LineBucket::OperatingExpenses),
            _ => None,
        },
    }
}

/// Only settled (paid) sales count as gross sales.
pub fn classify_sale(status: SaleStatus) -> Option<LineBucket> {
    match status {
        SaleStatus::Paid => Some(LineBucket::GrossSales),
        _ => None,
    }
}

/// A dated amount that can be placed on an income statement line.
pub trait Classifiable {
    fn amount(&self) -> f64;
    fn occurred_at(&self) -> NaiveDateTime;
    fn bucket(&self) -> Option<LineBucket>;
}

impl Classifiable for FinancialRecord {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn occurred_at(&self) -> NaiveDateTime {
        self.date
    }

    fn bucket(&self) -> Option<LineBucket> {
        classify(self.kind, &self.category_type)
    }
}

impl Classifiable for SalesRecord {
    fn amount(&self) -> f64 {
        self.amount
    }

    fn occurred_at(&self) -> NaiveDateTime {
        self.date
    }

    fn bucket(&self) -> Option<LineBucket> {
        classify_sale(self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_income_classification() {
        assert_eq!(
            classify(RecordKind::Income, "service"),
            Some(LineBucket::ServiceRevenue)
        );
        assert_eq!(classify(RecordKind::Income, "revenue"), None);
        assert_eq!(
            classify(RecordKind::Income, "interest"),
            Some(LineBucket::OtherRevenue)
        );
        assert_eq!(classify(RecordKind::Income, ""), Some(LineBucket::OtherRevenue));
    }

    #[test]
    fn test_expense_classification_table() {
        let table = [
            ("tax", LineBucket::TaxDeductions),
            ("refund", LineBucket::RefundDeductions),
            ("material", LineBucket::DirectCosts),
            ("operational", LineBucket::OperatingExpenses),
            ("salary", LineBucket::OperatingExpenses),
            ("rent", LineBucket::OperatingExpenses),
            ("marketing", LineBucket::OperatingExpenses),
            ("financial", LineBucket::FinancialExpenses),
        ];

        for (category_type, bucket) in table {
            assert_eq!(
                classify(RecordKind::Expense, category_type),
                Some(bucket),
                "{}",
                category_type
            );
        }
    }

    #[test]
    fn test_unknown_expense_types_are_unclassified() {
        for category_type in ["service", "revenue", "travel", "Tax", "SALARY", ""] {
            assert_eq!(classify(RecordKind::Expense, category_type), None);
        }
    }

    #[test]
    fn test_only_paid_sales_are_gross_sales() {
        assert_eq!(classify_sale(SaleStatus::Paid), Some(LineBucket::GrossSales));
        for status in [
            SaleStatus::Draft,
            SaleStatus::Pending,
            SaleStatus::Overdue,
            SaleStatus::Cancelled,
        ] {
            assert_eq!(classify_sale(status), None);
        }
    }

    #[test]
    fn test_bucket_groups() {
        let revenue: Vec<_> = LineBucket::ALL.iter().filter(|b| b.is_revenue()).collect();
        let deductions: Vec<_> = LineBucket::ALL.iter().filter(|b| b.is_deduction()).collect();
        assert_eq!(revenue.len(), 3);
        assert_eq!(deductions.len(), 2);
        assert!(LineBucket::GrossSales < LineBucket::FinancialExpenses);
    }
}
