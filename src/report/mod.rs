use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

pub mod filter;
pub mod table;

pub use filter::{filter_columns, FilterError, AGE_GROUP_COLUMNS};
pub use table::{ContextColumns, ReportTable, CONTEXT_HEADERS};

/// The census tables requested for every municipality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportType {
    #[serde(rename = "DsAgeGroups")]
    AgeGroups,
    #[serde(rename = "DsPopulationGroups")]
    PopulationGroups,
    #[serde(rename = "DsSexes")]
    Sexes,
    #[serde(rename = "DsLanguages")]
    Languages,
    #[serde(rename = "DsHighestLevelEducations")]
    HighestLevelEducations,
    #[serde(rename = "DsTypeOfMainDwellings")]
    TypeOfMainDwellings,
    #[serde(rename = "DsAccessToPipedWaters")]
    AccessToPipedWaters,
    #[serde(rename = "DsMainToiletFacilitys")]
    MainToiletFacilitys,
    #[serde(rename = "DsRefuseDisposals")]
    RefuseDisposals,
    #[serde(rename = "DsEnergyForCookings")]
    EnergyForCookings,
    #[serde(rename = "DsSchoolAttendences")]
    SchoolAttendences,
}

impl ReportType {
    /// Processing order.
    pub const ALL: [ReportType; 11] = [
        ReportType::AgeGroups,
        ReportType::PopulationGroups,
        ReportType::Sexes,
        ReportType::Languages,
        ReportType::HighestLevelEducations,
        ReportType::TypeOfMainDwellings,
        ReportType::AccessToPipedWaters,
        ReportType::MainToiletFacilitys,
        ReportType::RefuseDisposals,
        ReportType::EnergyForCookings,
        ReportType::SchoolAttendences,
    ];

    /// API table name; also the prefix of the output file.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::AgeGroups => "DsAgeGroups",
            ReportType::PopulationGroups => "DsPopulationGroups",
            ReportType::Sexes => "DsSexes",
            ReportType::Languages => "DsLanguages",
            ReportType::HighestLevelEducations => "DsHighestLevelEducations",
            ReportType::TypeOfMainDwellings => "DsTypeOfMainDwellings",
            ReportType::AccessToPipedWaters => "DsAccessToPipedWaters",
            ReportType::MainToiletFacilitys => "DsMainToiletFacilitys",
            ReportType::RefuseDisposals => "DsRefuseDisposals",
            ReportType::EnergyForCookings => "DsEnergyForCookings",
            ReportType::SchoolAttendences => "DsSchoolAttendences",
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}_report.csv", self.as_str())
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown report type `{0}`")]
pub struct UnknownReportType(pub String);

impl FromStr for ReportType {
    type Err = UnknownReportType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ReportType::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| UnknownReportType(s.to_string()))
    }
}
