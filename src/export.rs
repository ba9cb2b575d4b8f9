use crate::classifier::LineBucket;
use crate::engine::DreReport;
use crate::period::PeriodWindow;
use crate::statement::IncomeStatement;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueUnit {
    Money,
    Percent,
    PercentagePoints,
}

impl ValueUnit {
    fn suffix(self) -> &'static str {
        match self {
            ValueUnit::Money => "",
            ValueUnit::Percent => "%",
            ValueUnit::PercentagePoints => " pp",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub section: String,
    pub label: String,
    pub value: f64,
    pub unit: ValueUnit,
}

impl ExportRow {
    fn new(section: &str, label: &str, value: f64, unit: ValueUnit) -> Self {
        Self {
            section: section.to_string(),
            label: label.to_string(),
            value,
            unit,
        }
    }
}

/// Fixed label/value layout of an income statement, ready to be written to a
/// spreadsheet. Row values are the statement's fields, unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementExport {
    pub title: String,
    pub window: Option<PeriodWindow>,
    pub rows: Vec<ExportRow>,
}

impl StatementExport {
    pub fn from_statement(title: impl Into<String>, statement: &IncomeStatement) -> Self {
        let lines = &statement.lines;
        let mut rows = Vec::new();

        for bucket in LineBucket::ALL.iter().filter(|b| b.is_revenue()) {
            rows.push(ExportRow::new(
                "Revenue",
                bucket.label(),
                lines.get(*bucket),
                ValueUnit::Money,
            ));
        }
        rows.push(ExportRow::new(
            "Revenue",
            "Gross revenue",
            statement.gross_revenue,
            ValueUnit::Money,
        ));

        for bucket in LineBucket::ALL.iter().filter(|b| b.is_deduction()) {
            rows.push(ExportRow::new(
                "Deductions",
                bucket.label(),
                lines.get(*bucket),
                ValueUnit::Money,
            ));
        }
        rows.push(ExportRow::new(
            "Deductions",
            "Total deductions",
            statement.deductions,
            ValueUnit::Money,
        ));
        rows.push(ExportRow::new(
            "Net revenue",
            "Net revenue",
            statement.net_revenue,
            ValueUnit::Money,
        ));

        for bucket in LineBucket::ALL
            .iter()
            .filter(|b| !b.is_revenue() && !b.is_deduction())
        {
            rows.push(ExportRow::new(
                "Costs and expenses",
                bucket.label(),
                lines.get(*bucket),
                ValueUnit::Money,
            ));
        }
        rows.push(ExportRow::new(
            "Costs and expenses",
            "Total costs and expenses",
            statement.total_costs_and_expenses,
            ValueUnit::Money,
        ));
        rows.push(ExportRow::new(
            "Result",
            "Net result",
            statement.net_result,
            ValueUnit::Money,
        ));
        rows.push(ExportRow::new(
            "Margins",
            "Gross margin",
            statement.gross_margin_pct,
            ValueUnit::Percent,
        ));
        rows.push(ExportRow::new(
            "Margins",
            "Net margin",
            statement.net_margin_pct,
            ValueUnit::Percent,
        ));

        if let Some(comparison) = &statement.comparison {
            rows.push(ExportRow::new(
                "Comparison",
                "Gross revenue change",
                comparison.gross_revenue_pct_change,
                ValueUnit::Percent,
            ));
            rows.push(ExportRow::new(
                "Comparison",
                "Net result change",
                comparison.net_result_pct_change,
                ValueUnit::Percent,
            ));
            rows.push(ExportRow::new(
                "Comparison",
                "Net margin change",
                comparison.net_margin_pt_change,
                ValueUnit::PercentagePoints,
            ));
        }

        Self {
            title: title.into(),
            window: None,
            rows,
        }
    }

    pub fn from_report(title: impl Into<String>, report: &DreReport) -> Self {
        let mut export = Self::from_statement(title, &report.statement);
        export.window = Some(report.window);
        export
    }

    pub fn value_of(&self, label: &str) -> Option<f64> {
        self.rows.iter().find(|r| r.label == label).map(|r| r.value)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str("Section,Line,Value,Unit\n");

        for row in &self.rows {
            output.push_str(&format!(
                "{},{},{:.2},{}\n",
                row.section,
                row.label,
                row.value,
                unit_code(row.unit)
            ));
        }

        output
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!("# {}\n\n", self.title));
        if let Some(window) = &self.window {
            output.push_str(&format!(
                "**Period:** {} to {} (compared with {} to {})\n\n",
                window.start.format("%Y-%m-%d"),
                window.end.format("%Y-%m-%d"),
                window.prior_start.format("%Y-%m-%d"),
                window.prior_end.format("%Y-%m-%d")
            ));
        }

        let mut current_section = "";
        for row in &self.rows {
            if row.section != current_section {
                if !current_section.is_empty() {
                    output.push('\n');
                }
                output.push_str(&format!("## {}\n\n", row.section));
                output.push_str("| Line | Value |\n|---|---:|\n");
                current_section = row.section.as_str();
            }
            output.push_str(&format!(
                "| {} | {:.2}{} |\n",
                row.label,
                row.value,
                row.unit.suffix()
            ));
        }
        output.push('\n');

        output
    }
}

fn unit_code(unit: ValueUnit) -> &'static str {
    match unit {
        ValueUnit::Money => "money",
        ValueUnit::Percent => "percent",
        ValueUnit::PercentagePoints => "pp",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::PeriodTotals;
    use crate::statement::calculate;

    fn statement(with_prior: bool) -> IncomeStatement {
        let current = PeriodTotals {
            gross_sales: 1000.0,
            service_revenue: 500.0,
            tax_deductions: 100.0,
            direct_costs: 200.0,
            operating_expenses: 300.0,
            ..PeriodTotals::default()
        };
        let prior = PeriodTotals {
            gross_sales: 1000.0,
            ..PeriodTotals::default()
        };
        calculate(&current, with_prior.then_some(&prior))
    }

    #[test]
    fn test_rows_mirror_statement() {
        let export = StatementExport::from_statement("DRE", &statement(false));

        assert_eq!(export.rows.len(), 15);
        assert_eq!(export.value_of("Gross sales"), Some(1000.0));
        assert_eq!(export.value_of("Gross revenue"), Some(1500.0));
        assert_eq!(export.value_of("Net revenue"), Some(1400.0));
        assert_eq!(export.value_of("Net result"), Some(900.0));
        assert_eq!(export.value_of("Net result change"), None);
    }

    #[test]
    fn test_comparison_rows_when_prior_present() {
        let export = StatementExport::from_statement("DRE", &statement(true));

        assert_eq!(export.rows.len(), 18);
        assert_eq!(export.value_of("Gross revenue change"), Some(50.0));
        assert_eq!(export.value_of("Net result change"), Some(-10.0));
    }

    #[test]
    fn test_to_csv() {
        let csv = StatementExport::from_statement("DRE", &statement(true)).to_csv();

        assert!(csv.starts_with("Section,Line,Value,Unit\n"));
        assert!(csv.contains("Revenue,Gross revenue,1500.00,money"));
        assert!(csv.contains("Margins,Gross margin,93.33,percent"));
        assert!(csv.contains("Comparison,Net margin change,-35.71,pp"));
    }

    #[test]
    fn test_to_markdown() {
        let markdown = StatementExport::from_statement("DRE - ACME", &statement(false)).to_markdown();

        assert!(markdown.contains("# DRE - ACME"));
        assert!(markdown.contains("## Costs and expenses"));
        assert!(markdown.contains("| Net margin | 64.29% |"));
    }
}
