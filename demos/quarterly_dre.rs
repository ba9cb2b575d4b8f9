use chrono::NaiveDate;
use dre_report::*;

fn main() -> Result<()> {
    println!("📊 Quarterly DRE Demo\n");

    let day = |m: u32, d: u32| {
        NaiveDate::from_ymd_opt(2024, m, d)
            .and_then(|date| date.and_hms_opt(9, 0, 0))
            .unwrap()
    };

    let records = RecordSet::new(
        vec![
            SalesRecord::paid(12_000.0, day(4, 10)),
            SalesRecord::paid(8_500.0, day(5, 22)),
            SalesRecord::paid(9_000.0, day(2, 14)),
            SalesRecord::paid(3_000.0, day(6, 2)).with_status(SaleStatus::Pending),
        ],
        vec![
            FinancialRecord::income("service", 4_000.0, day(4, 18)),
            FinancialRecord::income("interest", 150.0, day(6, 30)),
            FinancialRecord::expense("tax", 1_900.0, day(5, 10)),
            FinancialRecord::expense("material", 5_200.0, day(4, 25)),
            FinancialRecord::expense("salary", 7_000.0, day(5, 5)),
            FinancialRecord::expense("rent", 2_400.0, day(6, 5)),
            FinancialRecord::expense("salary", 6_500.0, day(2, 5)),
        ],
    );

    let engine = ReportEngine::new(InMemoryProvider::new(records), ReportConfig::new("Demo Corp"));
    let report = futures::executor::block_on(
        engine.generate(&ReportFilters::for_period(PeriodKind::Quarter), day(6, 15)),
    )?;

    let export = StatementExport::from_report("DRE - Demo Corp", &report);
    println!("{}", export.to_markdown());
    println!("CSV:\n{}", export.to_csv());

    Ok(())
}
