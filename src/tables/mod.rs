//! Demographic lookup tables.
//!
//! Decade-indexed rates, name frequency lists and the surname
//! rank-to-probability mapping. Tables are filled once (see [`loader`])
//! and only read afterwards. Every lookup takes an already-clamped decade
//! key; a miss is reported as an error instead of a default value.

pub mod loader;

use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

use crate::error::{FamilyTreeError, Result};

/// Birth and marriage rates for one decade.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecadeRates {
    /// Mean number of children per person.
    pub birth_rate: f64,
    /// Probability that an unpartnered person finds a partner.
    pub marriage_rate: f64,
}

/// A first name with its relative frequency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FirstNameEntry {
    pub name: String,
    pub frequency: f64,
}

/// A surname with its popularity rank (1 = most common).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurnameEntry {
    pub name: String,
    pub rank: u32,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DemographicTables {
    life_expectancy: BTreeMap<i32, f64>,
    rates: BTreeMap<i32, DecadeRates>,
    first_names: BTreeMap<i32, Vec<FirstNameEntry>>,
    surnames: BTreeMap<i32, Vec<SurnameEntry>>,
    /// Index 0 holds rank 1.
    rank_probability: Vec<f64>,
}

impl DemographicTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_life_expectancy(&mut self, decade: i32, years: f64) {
        self.life_expectancy.insert(decade, years);
    }

    pub fn insert_rates(&mut self, decade: i32, birth_rate: f64, marriage_rate: f64) {
        self.rates.insert(decade, DecadeRates { birth_rate, marriage_rate });
    }

    pub fn push_first_name(&mut self, decade: i32, name: impl Into<String>, frequency: f64) {
        self.first_names.entry(decade).or_default().push(FirstNameEntry {
            name: name.into(),
            frequency,
        });
    }

    pub fn push_surname(&mut self, decade: i32, name: impl Into<String>, rank: u32) {
        self.surnames.entry(decade).or_default().push(SurnameEntry {
            name: name.into(),
            rank,
        });
    }

    /// Replace the rank table; `probabilities[0]` is the weight of rank 1.
    pub fn set_rank_probabilities(&mut self, probabilities: Vec<f64>) {
        self.rank_probability = probabilities;
    }

    /// Expected additional years of life for people born in `decade`.
    pub fn life_expectancy(&self, decade: i32) -> Result<f64> {
        self.life_expectancy
            .get(&decade)
            .copied()
            .ok_or(FamilyTreeError::MissingDecade { table: "life expectancy", decade })
    }

    pub fn rates(&self, decade: i32) -> Result<DecadeRates> {
        self.rates
            .get(&decade)
            .copied()
            .ok_or(FamilyTreeError::MissingDecade { table: "birth/marriage rate", decade })
    }

    pub fn first_names(&self, decade: i32) -> Result<&[FirstNameEntry]> {
        self.first_names
            .get(&decade)
            .map(Vec::as_slice)
            .ok_or(FamilyTreeError::MissingDecade { table: "first name", decade })
    }

    pub fn surnames(&self, decade: i32) -> Result<&[SurnameEntry]> {
        self.surnames
            .get(&decade)
            .map(Vec::as_slice)
            .ok_or(FamilyTreeError::MissingDecade { table: "last name", decade })
    }

    /// Sampling weight for a 1-based surname rank.
    pub fn rank_probability(&self, rank: u32) -> Result<f64> {
        rank.checked_sub(1)
            .and_then(|idx| self.rank_probability.get(idx as usize))
            .copied()
            .ok_or(FamilyTreeError::MissingRank(rank))
    }

    /// Number of ranks the rank table covers.
    pub fn rank_count(&self) -> usize {
        self.rank_probability.len()
    }

    /// Decades present in every decade-indexed table.
    pub fn covered_decades(&self) -> Vec<i32> {
        self.life_expectancy
            .keys()
            .copied()
            .filter(|d| {
                self.rates.contains_key(d)
                    && self.first_names.contains_key(d)
                    && self.surnames.contains_key(d)
            })
            .collect()
    }

    /// Same rates and names for every decade in `first..=last`.
    ///
    /// Handy for fixtures and quick experiments where the decade plays
    /// no role.
    pub fn uniform(
        first: i32,
        last: i32,
        life_expectancy: f64,
        rates: DecadeRates,
        first_names: &[(&str, f64)],
        surnames: &[(&str, u32)],
        rank_probabilities: Vec<f64>,
    ) -> Self {
        let mut tables = Self::new();
        for decade in (first..=last).step_by(10) {
            tables.insert_life_expectancy(decade, life_expectancy);
            tables.insert_rates(decade, rates.birth_rate, rates.marriage_rate);
            for (name, freq) in first_names {
                tables.push_first_name(decade, *name, *freq);
            }
            for (name, rank) in surnames {
                tables.push_surname(decade, *name, *rank);
            }
        }
        tables.set_rank_probabilities(rank_probabilities);
        tables
    }
}
