use crate::config::{GroupSpec, PopulationFilter, ViewProfile};
use crate::pipeline::histogram::DEFAULT_BIN_COUNT;

const IDENTIFIER: &str = "COMP_NAME";
const PRIMARY: &str = "total_weighted_score";
const POPULATION_COLUMN: &str = "INSURANCE_TYPE";
const SECONDARY: &[&str] = &[
    "cat1_weighted_score",
    "cat2_weighted_score",
    "cat3_weighted_score",
    "cat4_weighted_score",
    "cat5_weighted_score",
];

#[derive(Debug, Clone, Copy)]
struct GroupDef {
    id: &'static str,
    label: &'static str,
    attribute: &'static str,
}

const SURVEY_GROUPS: &[GroupDef] = &[
    GroupDef {
        id: "size",
        label: "SIZE",
        attribute: "COMP_SIZE",
    },
    GroupDef {
        id: "roe",
        label: "ROE",
        attribute: "ROE",
    },
    GroupDef {
        id: "ews",
        label: "EWS_GROUP",
        attribute: "EWS_GROUP",
    },
];

impl ViewProfile {
    pub fn nonlife_v1() -> Self {
        survey_profile("Nonlife Insurance - Total Weighted score", "Nonlife")
    }

    pub fn life_v1() -> Self {
        survey_profile("Life Insurance - Total Weighted score", "Life")
    }
}

fn survey_profile(title: &str, population: &str) -> ViewProfile {
    ViewProfile {
        title: title.to_string(),
        population: Some(PopulationFilter {
            column: POPULATION_COLUMN.to_string(),
            value: population.to_string(),
        }),
        identifier: IDENTIFIER.to_string(),
        primary: PRIMARY.to_string(),
        secondary: SECONDARY.iter().map(|s| s.to_string()).collect(),
        allow_missing_primary: false,
        bin_count: DEFAULT_BIN_COUNT,
        groups: SURVEY_GROUPS
            .iter()
            .map(|g| GroupSpec {
                id: g.id.to_string(),
                label: g.label.to_string(),
                attribute: g.attribute.to_string(),
            })
            .collect(),
    }
}
