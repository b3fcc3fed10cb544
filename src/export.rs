//! JSON export of a generated tree.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::config::TreeConfig;
use crate::error::{FamilyTreeError, Result};
use crate::person::PersonId;
use crate::tree::FamilyTree;

#[derive(Serialize)]
struct PersonRecord<'a> {
    id: PersonId,
    first_name: &'a str,
    last_name: &'a str,
    birth_year: i32,
    death_year: i32,
    partner: Option<PersonId>,
    children: &'a [PersonId],
}

#[derive(Serialize)]
struct TreeExport<'a> {
    seed: Option<u64>,
    config: &'a TreeConfig,
    root_surnames: (&'a str, &'a str),
    total_people: usize,
    total_by_decade: BTreeMap<i32, usize>,
    duplicate_names: Vec<String>,
    people: Vec<PersonRecord<'a>>,
}

/// Render the population, its query results and the settings that
/// produced it as pretty JSON.
pub fn to_json(tree: &FamilyTree, seed: Option<u64>) -> Result<String> {
    let export = TreeExport {
        seed,
        config: tree.config(),
        root_surnames: tree.root_surnames(),
        total_people: tree.total_people(),
        total_by_decade: tree.total_by_decade(),
        duplicate_names: tree.duplicate_names(),
        people: tree
            .population()
            .map(|p| PersonRecord {
                id: p.id,
                first_name: &p.first_name,
                last_name: &p.last_name,
                birth_year: p.birth_year,
                death_year: p.death_year,
                partner: p.partner,
                children: &p.children,
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&export)?)
}

/// Write [`to_json`] output to `path`.
pub fn export_json(tree: &FamilyTree, seed: Option<u64>, path: &Path) -> Result<()> {
    let json = to_json(tree, seed)?;
    fs::write(path, json).map_err(|source| FamilyTreeError::Io {
        path: path.to_path_buf(),
        source,
    })
}
