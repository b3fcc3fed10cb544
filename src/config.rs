//! Configuration for family tree generation.

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};

use crate::error::{FamilyTreeError, Result};

/// Configuration parameters for tree generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Birth year of the two founders (default: 1950).
    pub start_year: i32,

    /// Nobody born after this year joins the population, and nobody born
    /// in or after it is expanded further (default: 2120).
    pub cutoff_year: i32,

    /// Earliest decade the tables cover; lookups clamp up to it.
    pub first_decade: i32,

    /// Latest decade the tables cover; lookups clamp down to it.
    pub last_decade: i32,

    /// Death year jitter in years, applied as uniform [-n, n].
    pub death_jitter: i32,

    /// Partners are born within this many years of the person.
    pub partner_age_spread: i32,

    /// Youngest parent age at a child's birth.
    pub min_parent_age: i32,

    /// Oldest parent age at a child's birth.
    pub max_parent_age: i32,

    /// Child count is drawn from ceil(birth_rate -/+ this value).
    pub children_spread: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            start_year: 1950,
            cutoff_year: 2120,
            first_decade: 1950,
            last_decade: 2120,
            death_jitter: 10,
            partner_age_spread: 10,
            min_parent_age: 25,
            max_parent_age: 45,
            children_spread: 1.5,
        }
    }
}

impl TreeConfig {
    /// Read a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| FamilyTreeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: TreeConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break lookups or termination.
    pub fn validate(&self) -> Result<()> {
        if self.cutoff_year < self.start_year {
            return Err(FamilyTreeError::InvalidConfig(format!(
                "cutoff year {} is before start year {}",
                self.cutoff_year, self.start_year
            )));
        }
        if self.first_decade % 10 != 0 || self.last_decade % 10 != 0 {
            return Err(FamilyTreeError::InvalidConfig(
                "decade bounds must be multiples of 10".to_string(),
            ));
        }
        if self.last_decade < self.first_decade {
            return Err(FamilyTreeError::InvalidConfig(format!(
                "decade range {}..{} is inverted",
                self.first_decade, self.last_decade
            )));
        }
        if self.min_parent_age <= 0 || self.max_parent_age < self.min_parent_age {
            return Err(FamilyTreeError::InvalidConfig(format!(
                "parent age range {}..{} must be positive and ordered",
                self.min_parent_age, self.max_parent_age
            )));
        }
        if self.death_jitter < 0 || self.partner_age_spread < 0 || self.children_spread < 0.0 {
            return Err(FamilyTreeError::InvalidConfig(
                "spreads and jitter must be non-negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Decade key for a year, clamped into the supported table range.
    pub fn lookup_decade(&self, year: i32) -> i32 {
        decade_of(year).clamp(self.first_decade, self.last_decade)
    }
}

/// Truncate a year down to its decade (1987 -> 1980).
pub fn decade_of(year: i32) -> i32 {
    year.div_euclid(10) * 10
}
