//! Family tree generation library
//!
//! Grows a multi-generational population from demographic tables: life
//! expectancy, birth and marriage rates, and first/last name frequencies
//! by decade.

pub mod config;
pub mod error;
pub mod export;
pub mod menu;
pub mod person;
pub mod sampling;
pub mod tables;
pub mod tree;

pub use config::TreeConfig;
pub use error::{FamilyTreeError, Result};
pub use person::{Person, PersonId};
pub use sampling::PersonFactory;
pub use tables::DemographicTables;
pub use tree::FamilyTree;
