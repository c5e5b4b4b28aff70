// src/config.rs

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::{env, fs, path::PathBuf};

use crate::fetch::urls::{Page, DEFAULT_BASE_URL};
use crate::report::ReportType;

pub const CONFIG_ENV: &str = "CENSUS_CONFIG";
pub const BASE_URL_ENV: &str = "CENSUS_BASE_URL";
pub const OUTPUT_DIR_ENV: &str = "CENSUS_OUTPUT_DIR";
pub const TIMEOUT_ENV: &str = "CENSUS_TIMEOUT_SECS";

/// Runtime settings for one crawl.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub base_url: String,
    pub output_dir: PathBuf,
    pub timeout_secs: u64,
    pub page: u32,
    pub page_size: u32,
    /// Report types to request for every municipality, in processing order.
    pub report_types: Vec<ReportType>,
}

impl Default for Config {
    fn default() -> Self {
        let page = Page::default();
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from("data"),
            timeout_secs: 10,
            page: page.number,
            page_size: page.size,
            report_types: ReportType::ALL.to_vec(),
        }
    }
}

impl Config {
    /// Defaults, then the YAML file named by `CENSUS_CONFIG`, then env overrides.
    pub fn load() -> Result<Self> {
        let mut config = match env::var(CONFIG_ENV) {
            Ok(path) => {
                let text = fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {}", path))?;
                Self::from_yaml_str(&text).with_context(|| format!("parsing {}", path))?
            }
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(text)?;
        Ok(config)
    }

    /// Apply `CENSUS_*` overrides using `lookup` as the variable source.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_ENV) {
            self.base_url = url;
        }
        if let Some(dir) = lookup(OUTPUT_DIR_ENV) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(secs) = lookup(TIMEOUT_ENV) {
            self.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("{} must be a whole number of seconds", TIMEOUT_ENV))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.report_types.is_empty() {
            bail!("report_types must name at least one report");
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be positive");
        }
        if self.page == 0 || self.page_size == 0 {
            bail!("page and page_size must be positive");
        }
        url::Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url {}", self.base_url))?;
        Ok(())
    }

    pub fn page(&self) -> Page {
        Page {
            number: self.page,
            size: self.page_size,
        }
    }
}
