//! People in the family tree.

use std::fmt;

use serde::{Serialize, Deserialize};

/// Index of a person in the tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PersonId(pub u32);

impl PersonId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PersonId({})", self.0)
    }
}

/// One generated individual.
///
/// Relationships are ids into the owning tree. The struct stores them and
/// nothing more: keeping the partner link mutual and copying each child to
/// the partner is the builder's job.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub first_name: String,
    pub last_name: String,
    pub birth_year: i32,
    /// Informational only; nothing checks it against children or partners.
    pub death_year: i32,

    pub partner: Option<PersonId>,
    pub children: Vec<PersonId>,
}

impl Person {
    pub fn new(
        id: PersonId,
        first_name: String,
        last_name: String,
        birth_year: i32,
        death_year: i32,
    ) -> Self {
        Self {
            id,
            first_name,
            last_name,
            birth_year,
            death_year,
            partner: None,
            children: Vec::new(),
        }
    }

    /// "First Last", single space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn set_partner(&mut self, partner: PersonId) {
        self.partner = Some(partner);
    }

    /// Append a child. Children are never removed or reordered.
    pub fn add_child(&mut self, child: PersonId) {
        self.children.push(child);
    }

    pub fn has_partner(&self) -> bool {
        self.partner.is_some()
    }

    /// Years between birth and death.
    pub fn lifespan(&self) -> i32 {
        self.death_year - self.birth_year
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> Person {
        Person::new(PersonId(0), "Ada".to_string(), "Lovelace".to_string(), 1950, 2021)
    }

    #[test]
    fn test_person_creation() {
        let p = ada();
        assert_eq!(p.full_name(), "Ada Lovelace");
        assert!(!p.has_partner());
        assert!(p.children.is_empty());
        assert_eq!(p.lifespan(), 71);
    }

    #[test]
    fn test_children_append_in_order() {
        let mut p = ada();
        p.add_child(PersonId(4));
        p.add_child(PersonId(2));
        p.add_child(PersonId(9));
        assert_eq!(p.children, vec![PersonId(4), PersonId(2), PersonId(9)]);
    }

    #[test]
    fn test_set_partner() {
        let mut p = ada();
        p.set_partner(PersonId(7));
        assert_eq!(p.partner, Some(PersonId(7)));
        assert_eq!(PersonId(7).to_string(), "PersonId(7)");
    }
}
