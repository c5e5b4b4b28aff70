pub mod config;
pub mod crawl;
pub mod fetch;
pub mod report;
pub mod sink;

pub use config::Config;
pub use crawl::{CrawlSummary, Crawler};
pub use fetch::{CatalogClient, FetchOutcome};
pub use report::{ContextColumns, ReportTable, ReportType};
pub use sink::{CsvSink, SinkError};
