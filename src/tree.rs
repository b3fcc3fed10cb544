//! Family tree generation.
//!
//! Two founders born in the start year are paired and the first of them is
//! expanded depth-first: give an unpartnered person a partner (marriage-rate
//! coin flip), draw their children, then expand each child in turn before
//! moving to its next sibling. Partners are never expanded themselves.
//!
//! Expansion uses an explicit stack instead of recursion. Children are
//! appended to the population when they are popped, which reproduces the
//! order a recursive walk would produce.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as _;

use rand::Rng;
use tracing::{debug, info};

use crate::config::{decade_of, TreeConfig};
use crate::error::Result;
use crate::person::{Person, PersonId};
use crate::sampling::PersonFactory;
use crate::tables::DemographicTables;

/// A generated population and its relationships.
///
/// Every generated person lives in one arena and is addressed by
/// [`PersonId`]. People born after the cutoff stay in the arena so their
/// parent/partner links remain valid, but they are not population members
/// and no query counts them.
#[derive(Clone, Debug)]
pub struct FamilyTree {
    people: Vec<Person>,
    population: Vec<PersonId>,
    founders: (PersonId, PersonId),
    root_surnames: (String, String),
    config: TreeConfig,
}

impl FamilyTree {
    /// Grow a complete tree. Any table miss aborts the whole generation.
    pub fn generate(
        tables: &DemographicTables,
        config: &TreeConfig,
        rng: &mut impl Rng,
    ) -> Result<Self> {
        config.validate()?;
        let mut factory = PersonFactory::new(tables, config);

        let first = factory.create_person(PersonId(0), config.start_year, false, rng)?;
        let second = factory.create_person(PersonId(1), config.start_year, false, rng)?;
        let root_surnames = (first.last_name.clone(), second.last_name.clone());
        factory.set_root_surnames(root_surnames.0.clone(), root_surnames.1.clone());

        let mut tree = Self {
            people: Vec::new(),
            population: Vec::new(),
            founders: (first.id, second.id),
            root_surnames,
            config: config.clone(),
        };
        let a = tree.insert(first);
        let b = tree.insert(second);
        tree.link_partners(a, b);
        tree.population.push(a);
        tree.population.push(b);

        tree.grow(&factory, a, rng)?;

        info!(
            members = tree.population.len(),
            generated = tree.people.len(),
            "family tree generated"
        );
        Ok(tree)
    }

    fn next_id(&self) -> PersonId {
        PersonId(self.people.len() as u32)
    }

    fn insert(&mut self, person: Person) -> PersonId {
        let id = person.id;
        debug_assert_eq!(id, self.next_id());
        self.people.push(person);
        id
    }

    fn link_partners(&mut self, a: PersonId, b: PersonId) {
        self.people[a.index()].set_partner(b);
        self.people[b.index()].set_partner(a);
    }

    fn grow(&mut self, factory: &PersonFactory, root: PersonId, rng: &mut impl Rng) -> Result<()> {
        let mut pending = Vec::new();
        self.expand(factory, root, &mut pending, rng)?;

        while let Some(id) = pending.pop() {
            self.population.push(id);
            self.expand(factory, id, &mut pending, rng)?;
        }
        Ok(())
    }

    /// One expansion step. Children that make the cutoff are pushed onto
    /// `pending` so the first-born is popped first.
    fn expand(
        &mut self,
        factory: &PersonFactory,
        id: PersonId,
        pending: &mut Vec<PersonId>,
        rng: &mut impl Rng,
    ) -> Result<()> {
        let cutoff = self.config.cutoff_year;
        let birth_year = self.people[id.index()].birth_year;
        if birth_year >= cutoff {
            return Ok(());
        }

        if !self.people[id.index()].has_partner() {
            let partner_id = self.next_id();
            if let Some(partner) = factory.create_partner(&self.people[id.index()], partner_id, rng)? {
                let partner_year = partner.birth_year;
                self.insert(partner);
                self.people[id.index()].set_partner(partner_id);
                if partner_year <= cutoff {
                    self.population.push(partner_id);
                }
            }
        }

        let first_child = self.next_id();
        let children = factory.create_children(&self.people[id.index()], first_child, rng)?;
        let partner = self.people[id.index()].partner;

        let mut kept = Vec::with_capacity(children.len());
        for child in children {
            let child_year = child.birth_year;
            let child_id = self.insert(child);
            self.people[id.index()].add_child(child_id);
            if let Some(partner) = partner {
                self.people[partner.index()].add_child(child_id);
            }
            if child_year <= cutoff {
                kept.push(child_id);
            }
        }

        debug!(
            person = %id,
            birth_year,
            partnered = partner.is_some(),
            children = self.people[id.index()].children.len(),
            kept = kept.len(),
            "expanded"
        );
        pending.extend(kept.into_iter().rev());
        Ok(())
    }

    /// Number of population members.
    pub fn total_people(&self) -> usize {
        self.population.len()
    }

    /// Member count per birth decade.
    pub fn total_by_decade(&self) -> BTreeMap<i32, usize> {
        let mut counts = BTreeMap::new();
        for person in self.population() {
            *counts.entry(decade_of(person.birth_year)).or_insert(0) += 1;
        }
        counts
    }

    /// Full names shared by more than one member, each listed once, in the
    /// order they first appear in the population.
    pub fn duplicate_names(&self) -> Vec<String> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut order = Vec::new();

        for person in self.population() {
            let name = person.full_name();
            let count = counts.entry(name.clone()).or_insert(0);
            if *count == 0 {
                order.push(name);
            }
            *count += 1;
        }

        order.into_iter().filter(|name| counts[name] > 1).collect()
    }

    /// Population members in the order they joined.
    pub fn population(&self) -> impl Iterator<Item = &Person> + '_ {
        self.population.iter().map(move |id| &self.people[id.index()])
    }

    pub fn member_ids(&self) -> &[PersonId] {
        &self.population
    }

    /// Any generated person, member or not.
    pub fn person(&self, id: PersonId) -> Option<&Person> {
        self.people.get(id.index())
    }

    /// Everyone generated, including people past the cutoff.
    pub fn generated(&self) -> &[Person] {
        &self.people
    }

    pub fn founders(&self) -> (PersonId, PersonId) {
        self.founders
    }

    pub fn root_surnames(&self) -> (&str, &str) {
        (&self.root_surnames.0, &self.root_surnames.1)
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn partner_of(&self, id: PersonId) -> Option<&Person> {
        self.person(id)?.partner.and_then(|p| self.person(p))
    }

    pub fn children_of(&self, id: PersonId) -> impl Iterator<Item = &Person> + '_ {
        self.person(id)
            .map(|p| p.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .filter_map(move |c| self.person(*c))
    }

    /// Text report of the three queries.
    pub fn summary(&self) -> String {
        let mut s = String::new();
        let (a, b) = self.root_surnames();
        let _ = writeln!(s, "=== Family tree: {} & {} ===", a, b);
        let _ = writeln!(s, "Total people: {}", self.total_people());
        let _ = writeln!(s, "By decade:");
        for (decade, count) in self.total_by_decade() {
            let _ = writeln!(s, "  {}: {}", decade, count);
        }
        let duplicates = self.duplicate_names();
        let _ = writeln!(s, "Duplicate names: {}", duplicates.len());
        for name in duplicates {
            let _ = writeln!(s, "  * {}", name);
        }
        s
    }
}
