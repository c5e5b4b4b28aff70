// src/crawl.rs

use anyhow::Result;
use std::fmt;
use tracing::{debug, error, info, instrument};

use crate::config::Config;
use crate::fetch::{CatalogClient, District, FetchOutcome, Municipality, Province, ReportRow};
use crate::report::{filter_columns, ContextColumns, ReportTable, ReportType};
use crate::sink::CsvSink;

/// Counters for one pass over the hierarchy.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    pub provinces: usize,
    pub districts: usize,
    pub municipalities: usize,
    pub report_fetches: usize,
    pub reports_written: usize,
    pub rows_written: usize,
    pub empty_reports: usize,
    /// Catalog and report calls that errored, timed out or returned non-2xx.
    pub failed_fetches: usize,
    pub missing_columns: usize,
    pub write_failures: usize,
}

impl fmt::Display for CrawlSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} provinces, {} districts, {} municipalities; {} report fetches → {} written ({} rows), {} empty, {} failed fetches, {} missing columns, {} write failures",
            self.provinces,
            self.districts,
            self.municipalities,
            self.report_fetches,
            self.reports_written,
            self.rows_written,
            self.empty_reports,
            self.failed_fetches,
            self.missing_columns,
            self.write_failures,
        )
    }
}

/// Walks province → district → municipality and pulls every configured
/// report for each municipality into the sink. Strictly sequential.
pub struct Crawler {
    catalog: CatalogClient,
    sink: CsvSink,
    reports: Vec<ReportType>,
}

impl Crawler {
    pub fn new(catalog: CatalogClient, sink: CsvSink, reports: Vec<ReportType>) -> Self {
        Self {
            catalog,
            sink,
            reports,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = CatalogClient::new(config)?;
        let sink = CsvSink::new(&config.output_dir)?;
        Ok(Self::new(catalog, sink, config.report_types.clone()))
    }

    pub fn sink(&self) -> &CsvSink {
        &self.sink
    }

    pub async fn run(&self) -> CrawlSummary {
        let mut summary = CrawlSummary::default();

        let provinces = tally(self.catalog.provinces().await, &mut summary);
        info!(count = provinces.len(), base = %self.catalog.base_url(), "provinces");

        for province in &provinces {
            summary.provinces += 1;
            self.crawl_province(province, &mut summary).await;
        }

        summary
    }

    #[instrument(level = "info", skip_all, fields(province = %province.name))]
    async fn crawl_province(&self, province: &Province, summary: &mut CrawlSummary) {
        let rows_before = summary.rows_written;
        let districts = tally(self.catalog.districts(&province.id).await, summary);
        debug!(count = districts.len(), "districts");

        for district in &districts {
            summary.districts += 1;
            let municipalities = tally(self.catalog.municipalities(&district.id).await, summary);
            if municipalities.is_empty() {
                debug!(district = %district.name, "no municipalities");
                continue;
            }

            for muni in &municipalities {
                summary.municipalities += 1;
                self.crawl_municipality(province, district, muni, summary)
                    .await;
            }
        }

        info!(
            districts = districts.len(),
            rows = summary.rows_written - rows_before,
            "province done"
        );
    }

    async fn crawl_municipality(
        &self,
        province: &Province,
        district: &District,
        muni: &Municipality,
        summary: &mut CrawlSummary,
    ) {
        for &report in &self.reports {
            summary.report_fetches += 1;
            let raw = match self.catalog.report(report, &muni.code).await {
                FetchOutcome::Data(rows) => rows,
                FetchOutcome::Empty => {
                    summary.empty_reports += 1;
                    continue;
                }
                FetchOutcome::Failed(_) => {
                    summary.failed_fetches += 1;
                    continue;
                }
            };

            let ctx = ContextColumns {
                province: province.name.clone(),
                district: district.name.clone(),
                municipality: muni.name.clone(),
                report,
            };
            self.write_report(&ctx, &raw, summary);
        }
    }

    /// Filter, decorate and persist one fetched report. Errors are logged and
    /// counted; they never stop the crawl.
    fn write_report(&self, ctx: &ContextColumns, raw: &[ReportRow], summary: &mut CrawlSummary) {
        let table = match filter_columns(&ReportTable::from_rows(raw), ctx.report) {
            Ok(t) => t.with_context(ctx),
            Err(e) => {
                error!(municipality = %ctx.municipality, error = %e, "report shape changed");
                summary.missing_columns += 1;
                return;
            }
        };

        match self.sink.append(ctx.report, &table) {
            Ok(rows) => {
                summary.reports_written += 1;
                summary.rows_written += rows;
            }
            Err(e) => {
                error!(
                    report = %ctx.report,
                    municipality = %ctx.municipality,
                    error = %e,
                    "error saving report"
                );
                summary.write_failures += 1;
            }
        }
    }
}

/// Unwrap a catalog list, counting failures.
fn tally<T>(outcome: FetchOutcome<Vec<T>>, summary: &mut CrawlSummary) -> Vec<T> {
    if outcome.is_failed() {
        summary.failed_fetches += 1;
    }
    outcome.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::urls::Page;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    fn crawler(root: &std::path::Path) -> Crawler {
        let client = reqwest::Client::new();
        let base = url::Url::parse("http://127.0.0.1:9").unwrap();
        Crawler::new(
            CatalogClient::with_client(client, base, Page::default()),
            CsvSink::new(root).unwrap(),
            vec![ReportType::AgeGroups, ReportType::Sexes],
        )
    }

    fn ctx(report: ReportType) -> ContextColumns {
        ContextColumns {
            province: "Western Cape".into(),
            district: "Cape Winelands".into(),
            municipality: "Stellenbosch".into(),
            report,
        }
    }

    #[test]
    fn missing_age_group_column_writes_nothing() {
        let tmp = tempdir().unwrap();
        let c = crawler(tmp.path());
        let raw: Vec<ReportRow> =
            serde_json::from_value(json!([{"label": "0-4", "countsMales": 10}])).unwrap();

        let mut summary = CrawlSummary::default();
        c.write_report(&ctx(ReportType::AgeGroups), &raw, &mut summary);

        assert_eq!(summary.missing_columns, 1);
        assert_eq!(summary.reports_written, 0);
        assert!(!c.sink().path_for(ReportType::AgeGroups).exists());
    }

    #[test]
    fn written_rows_carry_context() {
        let tmp = tempdir().unwrap();
        let c = crawler(tmp.path());
        let raw: Vec<ReportRow> = serde_json::from_value(json!([
            {"sexDesc": "Male", "sexDescString": "Manlik", "counts": 5},
            {"sexDesc": "Female", "sexDescString": "Vroulik", "counts": 6}
        ]))
        .unwrap();

        let mut summary = CrawlSummary::default();
        c.write_report(&ctx(ReportType::Sexes), &raw, &mut summary);
        assert_eq!(summary.rows_written, 2);

        let text = fs::read_to_string(c.sink().path_for(ReportType::Sexes)).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "sexDesc,counts,Province,District,Municipality,ReportType",
                "Male,5,Western Cape,Cape Winelands,Stellenbosch,DsSexes",
                "Female,6,Western Cape,Cape Winelands,Stellenbosch,DsSexes",
            ]
        );
    }

    #[test]
    fn write_failure_is_counted_not_raised() {
        let tmp = tempdir().unwrap();
        let c = crawler(tmp.path());
        fs::create_dir(c.sink().path_for(ReportType::Sexes)).unwrap();
        let raw: Vec<ReportRow> = serde_json::from_value(json!([{"counts": 1}])).unwrap();

        let mut summary = CrawlSummary::default();
        c.write_report(&ctx(ReportType::Sexes), &raw, &mut summary);
        assert_eq!(summary.write_failures, 1);
    }
}
