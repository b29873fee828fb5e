use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::histogram::{DEFAULT_BIN_COUNT, MAX_BIN_COUNT};

pub mod presets;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("cannot read profile {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse profile {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown built-in profile: {0} (use nonlife|life)")]
    UnknownPreset(String),
    #[error("invalid profile: {0}")]
    Invalid(String),
}

/// Restricts the loaded rows to one sub-population, e.g. one line of business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationFilter {
    pub column: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSpec {
    pub id: String,
    pub label: String,
    /// Categorical column this group filters on.
    pub attribute: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewProfile {
    pub title: String,
    #[serde(default)]
    pub population: Option<PopulationFilter>,
    pub identifier: String,
    pub primary: String,
    #[serde(default)]
    pub secondary: Vec<String>,
    #[serde(default)]
    pub allow_missing_primary: bool,
    #[serde(default = "default_bin_count")]
    pub bin_count: usize,
    pub groups: Vec<GroupSpec>,
}

fn default_bin_count() -> usize {
    DEFAULT_BIN_COUNT
}

impl ViewProfile {
    pub fn builtin(name: &str) -> Result<Self, ProfileError> {
        match name {
            "nonlife" => Ok(Self::nonlife_v1()),
            "life" => Ok(Self::life_v1()),
            other => Err(ProfileError::UnknownPreset(other.to_string())),
        }
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ProfileError> {
        let text = fs::read_to_string(path).map_err(|source| ProfileError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let profile: Self = serde_json::from_str(&text).map_err(|source| ProfileError::Json {
            path: path.display().to_string(),
            source,
        })?;
        profile.validate()?;
        Ok(profile)
    }

    /// Distinct categorical columns in group order.
    pub fn category_columns(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for group in &self.groups {
            if !out.contains(&group.attribute) {
                out.push(group.attribute.clone());
            }
        }
        out
    }

    pub fn group(&self, id: &str) -> Option<&GroupSpec> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn validate(&self) -> Result<(), ProfileError> {
        if self.groups.is_empty() {
            return Err(ProfileError::Invalid(
                "at least one filter group is required".to_string(),
            ));
        }
        let mut ids = HashSet::new();
        for group in &self.groups {
            if group.id.is_empty() {
                return Err(ProfileError::Invalid("group id is empty".to_string()));
            }
            if !ids.insert(group.id.as_str()) {
                return Err(ProfileError::Invalid(format!(
                    "duplicate group id: {}",
                    group.id
                )));
            }
        }
        if self.bin_count == 0 || self.bin_count > MAX_BIN_COUNT {
            return Err(ProfileError::Invalid(format!(
                "bin_count must be in 1..={}, got {}",
                MAX_BIN_COUNT, self.bin_count
            )));
        }
        if self.secondary.iter().any(|c| c == &self.primary) {
            return Err(ProfileError::Invalid(format!(
                "secondary columns repeat the primary column {}",
                self.primary
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/config/tests.rs"]
mod tests;
