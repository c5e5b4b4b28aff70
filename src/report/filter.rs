use super::{ReportTable, ReportType};

/// Columns kept for the age-groups report, in output order.
pub const AGE_GROUP_COLUMNS: [&str; 7] = [
    "timeSeriesDesc",
    "geoLevelValueDesc",
    "label",
    "countsMales",
    "countsPercentageMales",
    "countsFemales",
    "countsPercentageFemales",
];

/// Suffix marking locale display copies of another column.
const DISPLAY_SUFFIX: &str = "String";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("{report}: expected column `{column}` is missing")]
    MissingColumn { report: ReportType, column: String },
}

/// Restrict `table` to the columns written for `report`.
pub fn filter_columns(table: &ReportTable, report: ReportType) -> Result<ReportTable, FilterError> {
    let indices = match report {
        ReportType::AgeGroups => AGE_GROUP_COLUMNS
            .iter()
            .map(|&name| {
                table
                    .column_index(name)
                    .ok_or_else(|| FilterError::MissingColumn {
                        report,
                        column: name.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?,
        _ => table
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.ends_with(DISPLAY_SUFFIX))
            .map(|(i, _)| i)
            .collect(),
    };
    Ok(table.select(&indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str]) -> ReportTable {
        ReportTable {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: vec![columns.iter().map(|c| format!("v-{}", c)).collect()],
        }
    }

    #[test]
    fn drops_display_columns_keeping_order() {
        let t = table(&["sexDesc", "sexDescString", "counts", "countsString", "strings"]);
        let out = filter_columns(&t, ReportType::Sexes).unwrap();
        assert_eq!(out.columns, vec!["sexDesc", "counts", "strings"]);
        assert_eq!(out.rows[0], vec!["v-sexDesc", "v-counts", "v-strings"]);
    }

    #[test]
    fn suffix_match_is_case_sensitive() {
        let t = table(&["labelstring", "labelSTRING", "labelString"]);
        let out = filter_columns(&t, ReportType::Languages).unwrap();
        assert_eq!(out.columns, vec!["labelstring", "labelSTRING"]);
    }

    #[test]
    fn age_groups_use_allow_list_order() {
        let mut cols: Vec<&str> = AGE_GROUP_COLUMNS.iter().rev().copied().collect();
        cols.push("extra");
        cols.push("labelString");
        let out = filter_columns(&table(&cols), ReportType::AgeGroups).unwrap();
        assert_eq!(out.columns, AGE_GROUP_COLUMNS.to_vec());
        assert_eq!(out.rows[0][0], "v-timeSeriesDesc");
    }

    #[test]
    fn age_groups_missing_column_is_an_error() {
        let cols: Vec<&str> = AGE_GROUP_COLUMNS
            .iter()
            .copied()
            .filter(|c| *c != "countsFemales")
            .collect();
        let err = filter_columns(&table(&cols), ReportType::AgeGroups).unwrap_err();
        assert_eq!(
            err,
            FilterError::MissingColumn {
                report: ReportType::AgeGroups,
                column: "countsFemales".into()
            }
        );
    }
}
