use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// One raw report row as returned by the API; schema varies per report type.
pub type ReportRow = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Province {
    #[serde(rename = "provinceId", deserialize_with = "key_from_number_or_string")]
    pub id: String,
    #[serde(rename = "provinceDesc")]
    pub name: String,
    #[serde(rename = "provinceAbbreviation", default)]
    pub abbreviation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct District {
    #[serde(rename = "districtMdbc", deserialize_with = "key_from_number_or_string")]
    pub id: String,
    #[serde(rename = "districtName")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Municipality {
    #[serde(rename = "muniCode", deserialize_with = "key_from_number_or_string")]
    pub code: String,
    #[serde(rename = "muniName")]
    pub name: String,
}

/// Catalog keys show up as either JSON numbers or strings; keep them as text.
fn key_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Key {
        Int(i64),
        Text(String),
    }

    Ok(match Key::deserialize(deserializer)? {
        Key::Int(n) => n.to_string(),
        Key::Text(s) => s,
    })
}
