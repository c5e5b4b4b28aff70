// src/fetch/urls.rs
use url::Url;

use crate::report::ReportType;

pub const DEFAULT_BASE_URL: &str = "https://disseminationapi-a2f6fff8f7a3f3ff.z01.azurefd.net";

/// Pagination baked into every report request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u32,
    pub size: u32,
}

impl Default for Page {
    fn default() -> Self {
        Self { number: 1, size: 3 }
    }
}

pub fn provinces() -> String {
    "api/Provinces/getAll/".to_string()
}

pub fn districts(province_id: &str) -> String {
    format!("api/Districts/listByProvince/{}", province_id)
}

pub fn municipalities(district_id: &str) -> String {
    format!("api/Municipalities/listByDistrict/{}", district_id)
}

/// `api/{T}/get{T}Report/{page}/{size}/{muni}`
pub fn report(report: ReportType, page: Page, muni_code: &str) -> String {
    let table = report.as_str();
    format!(
        "api/{}/get{}Report/{}/{}/{}",
        table, table, page.number, page.size, muni_code
    )
}

/// Join a relative API path onto `base`, treating `base` as a directory.
pub fn endpoint(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    if base.path().ends_with('/') {
        base.join(path)
    } else {
        let mut dir = base.clone();
        dir.set_path(&format!("{}/", base.path()));
        dir.join(path)
    }
}
