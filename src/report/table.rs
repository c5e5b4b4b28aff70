use serde_json::Value;

use super::ReportType;
use crate::fetch::ReportRow;

/// Headers appended after the report's own columns, in this order.
pub const CONTEXT_HEADERS: [&str; 4] = ["Province", "District", "Municipality", "ReportType"];

/// Where a report came from in the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextColumns {
    pub province: String,
    pub district: String,
    pub municipality: String,
    pub report: ReportType,
}

impl ContextColumns {
    fn values(&self) -> [String; 4] {
        [
            self.province.clone(),
            self.district.clone(),
            self.municipality.clone(),
            self.report.as_str().to_string(),
        ]
    }
}

/// Rectangular, stringly-typed view of a report page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ReportTable {
    /// Columns are the union of keys across rows, in first-seen order.
    pub fn from_rows(raw: &[ReportRow]) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in raw {
            for key in row.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }

        let rows = raw
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|c| row.get(c).map(render_cell).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Project onto the given column indices, in the given order.
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            columns: indices.iter().map(|&i| self.columns[i].clone()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| indices.iter().map(|&i| r[i].clone()).collect())
                .collect(),
        }
    }

    pub fn with_context(mut self, ctx: &ContextColumns) -> Self {
        self.columns
            .extend(CONTEXT_HEADERS.iter().map(|h| h.to_string()));
        let values = ctx.values();
        for row in &mut self.rows {
            row.extend(values.iter().cloned());
        }
        self
    }
}

fn render_cell(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(v: Value) -> Vec<ReportRow> {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn union_of_keys_with_blank_cells() {
        let t = ReportTable::from_rows(&rows(json!([
            {"a": 1, "b": "x"},
            {"b": "y", "c": null, "d": true}
        ])));
        assert_eq!(t.columns, vec!["a", "b", "c", "d"]);
        assert_eq!(t.rows[0], vec!["1", "x", "", ""]);
        assert_eq!(t.rows[1], vec!["", "y", "", "True"]);
    }

    #[test]
    fn source_key_order_is_kept() {
        let t = ReportTable::from_rows(&rows(json!([{"zeta": 1, "alpha": 2.5}])));
        assert_eq!(t.columns, vec!["zeta", "alpha"]);
        assert_eq!(t.rows[0], vec!["1", "2.5"]);
    }

    #[test]
    fn context_columns_are_appended() {
        let t = ReportTable::from_rows(&rows(json!([{"counts": 4}])));
        let ctx = ContextColumns {
            province: "Gauteng".into(),
            district: "Sedibeng".into(),
            municipality: "Emfuleni".into(),
            report: ReportType::Languages,
        };
        let t = t.with_context(&ctx);
        assert_eq!(
            t.columns,
            vec!["counts", "Province", "District", "Municipality", "ReportType"]
        );
        assert_eq!(
            t.rows[0],
            vec!["4", "Gauteng", "Sedibeng", "Emfuleni", "DsLanguages"]
        );
    }
}
