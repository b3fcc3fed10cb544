//! Weighted sampling of people from the demographic tables.
//!
//! Every draw clamps the birth decade into the table range before the
//! lookup, and takes the random source as an argument so generation is
//! reproducible from a seed.

use rand::distributions::{Distribution, WeightedError, WeightedIndex};
use rand::Rng;

use crate::config::TreeConfig;
use crate::error::{FamilyTreeError, Result};
use crate::person::{Person, PersonId};
use crate::tables::DemographicTables;

/// Builds people, partners and children from the tables.
pub struct PersonFactory<'a> {
    tables: &'a DemographicTables,
    config: &'a TreeConfig,
    root_surnames: Option<(String, String)>,
}

impl<'a> PersonFactory<'a> {
    pub fn new(tables: &'a DemographicTables, config: &'a TreeConfig) -> Self {
        Self { tables, config, root_surnames: None }
    }

    /// Record the founders' surnames. Descendants drawn afterwards take
    /// one of these two instead of a table surname.
    pub fn set_root_surnames(&mut self, first: String, second: String) {
        self.root_surnames = Some((first, second));
    }

    /// Birth year + decade life expectancy + uniform jitter, rounded half
    /// to even.
    pub fn death_year(&self, birth_year: i32, rng: &mut impl Rng) -> Result<i32> {
        let decade = self.config.lookup_decade(birth_year);
        let expectancy = self.tables.life_expectancy(decade)?;
        let jitter = self.config.death_jitter;
        let adjustment = rng.gen_range(-jitter..=jitter);
        Ok((birth_year as f64 + expectancy + adjustment as f64).round_ties_even() as i32)
    }

    /// First name weighted by the decade's frequency column.
    pub fn first_name(&self, birth_year: i32, rng: &mut impl Rng) -> Result<String> {
        let decade = self.config.lookup_decade(birth_year);
        let entries = self.tables.first_names(decade)?;
        let weights: Vec<f64> = entries.iter().map(|e| e.frequency).collect();
        let idx = weighted_pick(&weights, "first name", decade, rng)?;
        Ok(entries[idx].name.clone())
    }

    /// Descendants get one of the root surnames at even odds once those are
    /// set; everyone else gets a table surname weighted by rank probability.
    pub fn last_name(&self, birth_year: i32, is_descendant: bool, rng: &mut impl Rng) -> Result<String> {
        if is_descendant {
            if let Some((first, second)) = &self.root_surnames {
                let pick = if rng.gen_bool(0.5) { first } else { second };
                return Ok(pick.clone());
            }
        }

        let decade = self.config.lookup_decade(birth_year);
        let entries = self.tables.surnames(decade)?;
        let weights = entries
            .iter()
            .map(|e| self.tables.rank_probability(e.rank))
            .collect::<Result<Vec<f64>>>()?;
        let idx = weighted_pick(&weights, "last name", decade, rng)?;
        Ok(entries[idx].name.clone())
    }

    /// Draw a complete person born in `birth_year`.
    pub fn create_person(
        &self,
        id: PersonId,
        birth_year: i32,
        is_descendant: bool,
        rng: &mut impl Rng,
    ) -> Result<Person> {
        let first_name = self.first_name(birth_year, rng)?;
        let last_name = self.last_name(birth_year, is_descendant, rng)?;
        let death_year = self.death_year(birth_year, rng)?;
        Ok(Person::new(id, first_name, last_name, birth_year, death_year))
    }

    /// Flip the marriage-rate coin for `person`. On success returns a
    /// non-descendant partner born within the configured spread, already
    /// pointing back at `person`; the caller links the other direction.
    pub fn create_partner(
        &self,
        person: &Person,
        id: PersonId,
        rng: &mut impl Rng,
    ) -> Result<Option<Person>> {
        let decade = self.config.lookup_decade(person.birth_year);
        let marriage_rate = self.tables.rates(decade)?.marriage_rate;

        if rng.gen::<f64>() >= marriage_rate {
            return Ok(None);
        }

        let spread = self.config.partner_age_spread;
        let year = rng.gen_range(person.birth_year - spread..=person.birth_year + spread);
        let mut partner = self.create_person(id, year, false, rng)?;
        partner.set_partner(person.id);
        Ok(Some(partner))
    }

    /// Number of children for someone born in `birth_year`, uniform over
    /// [ceil(rate - spread), ceil(rate + spread)] with the floor at zero.
    pub fn child_count(&self, birth_year: i32, rng: &mut impl Rng) -> Result<u32> {
        let decade = self.config.lookup_decade(birth_year);
        let birth_rate = self.tables.rates(decade)?.birth_rate;
        let (min, max) = child_count_bounds(birth_rate, self.config.children_spread);
        Ok(rng.gen_range(min..=max))
    }

    /// Draw the children of `parent` as descendants, ids starting at
    /// `first_id`. Attaching them to the parent and partner is left to the
    /// caller.
    pub fn create_children(
        &self,
        parent: &Person,
        first_id: PersonId,
        rng: &mut impl Rng,
    ) -> Result<Vec<Person>> {
        let count = self.child_count(parent.birth_year, rng)?;
        let mut children = Vec::with_capacity(count as usize);

        for offset in 0..count {
            let age = rng.gen_range(self.config.min_parent_age..=self.config.max_parent_age);
            let id = PersonId(first_id.0 + offset);
            children.push(self.create_person(id, parent.birth_year + age, true, rng)?);
        }
        Ok(children)
    }
}

/// Inclusive child-count range for a birth rate.
pub fn child_count_bounds(birth_rate: f64, spread: f64) -> (u32, u32) {
    let min = (birth_rate - spread).ceil().max(0.0);
    let max = (birth_rate + spread).ceil().max(min);
    (min as u32, max as u32)
}

/// Index drawn with probability proportional to its weight.
fn weighted_pick(
    weights: &[f64],
    table: &'static str,
    decade: i32,
    rng: &mut impl Rng,
) -> Result<usize> {
    match WeightedIndex::<f64>::new(weights) {
        Ok(dist) => Ok(dist.sample(rng)),
        Err(WeightedError::NoItem) => Err(FamilyTreeError::EmptyChoices { table, decade }),
        Err(e) => Err(FamilyTreeError::InvalidWeights {
            table,
            decade,
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::DecadeRates;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn tables(marriage_rate: f64) -> DemographicTables {
        DemographicTables::uniform(
            1950,
            2120,
            70.0,
            DecadeRates { birth_rate: 2.0, marriage_rate },
            &[("Ada", 1.0), ("Ben", 1.0), ("Cy", 0.0)],
            &[("Smith", 1), ("Jones", 2), ("Never", 3)],
            vec![0.6, 0.4, 0.0],
        )
    }

    #[test]
    fn test_death_year_within_jitter() {
        let tables = tables(1.0);
        let config = TreeConfig::default();
        let factory = PersonFactory::new(&tables, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..200 {
            let died = factory.death_year(1987, &mut rng).unwrap();
            assert!((2047..=2067).contains(&died), "death year {died}");
        }
    }

    #[test]
    fn test_death_year_rounds_half_to_even() {
        let tables = DemographicTables::uniform(
            1950,
            2120,
            71.5,
            DecadeRates { birth_rate: 2.0, marriage_rate: 1.0 },
            &[("Ada", 1.0)],
            &[("Smith", 1)],
            vec![1.0],
        );
        let config = TreeConfig { death_jitter: 0, ..TreeConfig::default() };
        let factory = PersonFactory::new(&tables, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        // 2062.5 and 2061.5 both land on the even year.
        assert_eq!(factory.death_year(1991, &mut rng).unwrap(), 2062);
        assert_eq!(factory.death_year(1990, &mut rng).unwrap(), 2062);
        assert_eq!(factory.death_year(1993, &mut rng).unwrap(), 2064);
    }

    #[test]
    fn test_lookup_clamps_out_of_range_years() {
        let mut tables = tables(1.0);
        tables.insert_life_expectancy(2120, 10.0);
        let config = TreeConfig { death_jitter: 0, ..TreeConfig::default() };
        let factory = PersonFactory::new(&tables, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        // 2135 falls in the 2130s, which clamps to the 2120 row.
        assert_eq!(factory.death_year(2135, &mut rng).unwrap(), 2145);
        // 1940 clamps up to 1950.
        assert_eq!(factory.death_year(1940, &mut rng).unwrap(), 2010);
        assert!(factory.first_name(1900, &mut rng).is_ok());
    }

    #[test]
    fn test_zero_weight_names_never_drawn() {
        let tables = tables(1.0);
        let config = TreeConfig::default();
        let factory = PersonFactory::new(&tables, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..300 {
            assert_ne!(factory.first_name(1960, &mut rng).unwrap(), "Cy");
            assert_ne!(factory.last_name(1960, false, &mut rng).unwrap(), "Never");
        }
    }

    #[test]
    fn test_first_names_follow_relative_weights() {
        let mut tables = DemographicTables::new();
        tables.push_first_name(1950, "Common", 9.0);
        tables.push_first_name(1950, "Rare", 1.0);
        let config = TreeConfig::default();
        let factory = PersonFactory::new(&tables, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let common = (0..2000)
            .filter(|_| factory.first_name(1955, &mut rng).unwrap() == "Common")
            .count();
        assert!(common > 1600 && common < 1990, "common drawn {common} times");
    }

    #[test]
    fn test_descendants_use_root_surnames() {
        let tables = tables(1.0);
        let config = TreeConfig::default();
        let mut factory = PersonFactory::new(&tables, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        // Before roots exist, descendants fall back to the table.
        let name = factory.last_name(1980, true, &mut rng).unwrap();
        assert!(name == "Smith" || name == "Jones");

        factory.set_root_surnames("Root".to_string(), "Stock".to_string());
        let mut seen_root = false;
        let mut seen_stock = false;
        for _ in 0..100 {
            match factory.last_name(1980, true, &mut rng).unwrap().as_str() {
                "Root" => seen_root = true,
                "Stock" => seen_stock = true,
                other => panic!("descendant got non-root surname {other}"),
            }
        }
        assert!(seen_root && seen_stock);

        // Non-descendants still come from the table.
        let name = factory.last_name(1980, false, &mut rng).unwrap();
        assert!(name == "Smith" || name == "Jones");
    }

    #[test]
    fn test_missing_or_unusable_name_list_is_an_error() {
        let empty = DemographicTables::new();
        let config = TreeConfig::default();
        let factory = PersonFactory::new(&empty, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        assert!(matches!(
            factory.first_name(1950, &mut rng),
            Err(FamilyTreeError::MissingDecade { table: "first name", decade: 1950 })
        ));

        let mut blank = DemographicTables::new();
        blank.push_first_name(1950, "Only", 0.0);
        let factory = PersonFactory::new(&blank, &config);
        assert!(matches!(
            factory.first_name(1950, &mut rng),
            Err(FamilyTreeError::InvalidWeights { .. })
        ));
    }

    #[test]
    fn test_weighted_pick_rejects_empty_list() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert!(matches!(
            weighted_pick(&[], "first name", 1970, &mut rng),
            Err(FamilyTreeError::EmptyChoices { table: "first name", decade: 1970 })
        ));
        assert!(matches!(
            weighted_pick(&[1.0, -2.0], "last name", 1970, &mut rng),
            Err(FamilyTreeError::InvalidWeights { .. })
        ));
        assert_eq!(weighted_pick(&[0.0, 3.0], "last name", 1970, &mut rng).unwrap(), 1);
    }

    #[test]
    fn test_unmapped_rank_is_an_error() {
        let mut tables = DemographicTables::new();
        tables.push_surname(1950, "Smith", 1);
        tables.push_surname(1950, "Jones", 5);
        tables.set_rank_probabilities(vec![0.5, 0.5]);
        let config = TreeConfig::default();
        let factory = PersonFactory::new(&tables, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        assert!(matches!(
            factory.last_name(1950, false, &mut rng),
            Err(FamilyTreeError::MissingRank(5))
        ));
    }

    #[test]
    fn test_child_count_bounds() {
        assert_eq!(child_count_bounds(2.0, 1.5), (1, 4));
        assert_eq!(child_count_bounds(0.5, 1.5), (0, 2));
        assert_eq!(child_count_bounds(3.1, 1.5), (2, 5));
        assert_eq!(child_count_bounds(0.0, 0.0), (0, 0));
    }

    #[test]
    fn test_partner_always_created_at_full_marriage_rate() {
        let tables = tables(1.0);
        let config = TreeConfig::default();
        let factory = PersonFactory::new(&tables, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let person = factory.create_person(PersonId(0), 1990, true, &mut rng).unwrap();

        for i in 1..50 {
            let partner = factory
                .create_partner(&person, PersonId(i), &mut rng)
                .unwrap()
                .expect("marriage rate 1.0 always pairs");
            assert_eq!(partner.id, PersonId(i));
            assert_eq!(partner.partner, Some(person.id));
            assert!((1980..=2000).contains(&partner.birth_year));
        }
    }

    #[test]
    fn test_no_partner_at_zero_marriage_rate() {
        let tables = tables(0.0);
        let config = TreeConfig::default();
        let factory = PersonFactory::new(&tables, &config);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let person = factory.create_person(PersonId(0), 1990, false, &mut rng).unwrap();

        for _ in 0..50 {
            assert!(factory.create_partner(&person, PersonId(1), &mut rng).unwrap().is_none());
        }
    }

    #[test]
    fn test_children_are_descendants_born_25_to_45_years_later() {
        let tables = tables(1.0);
        let config = TreeConfig::default();
        let mut factory = PersonFactory::new(&tables, &config);
        factory.set_root_surnames("Root".to_string(), "Stock".to_string());
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let parent = factory.create_person(PersonId(0), 2000, true, &mut rng).unwrap();

        for _ in 0..30 {
            let children = factory.create_children(&parent, PersonId(10), &mut rng).unwrap();
            assert!(children.len() <= 4);
            for (i, child) in children.iter().enumerate() {
                assert_eq!(child.id, PersonId(10 + i as u32));
                assert!((2025..=2045).contains(&child.birth_year));
                assert!(child.last_name == "Root" || child.last_name == "Stock");
                assert!(child.partner.is_none());
            }
        }
    }
}
