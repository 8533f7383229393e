//! The set of people whose finances are simulated together

use std::collections::HashSet;

use serde::Serialize;

use super::person::{Person, PersonId};
use crate::error::ConfigError;

/// Family members in a fixed order; a member's index is their [`PersonId`]
///
/// Spouse links only come from [`Family::marry`], so they are always
/// symmetric and point inside the family.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Family {
    members: Vec<Person>,
}

impl Family {
    /// Create a family, rejecting duplicate names
    ///
    /// Members arrive unmarried; links carried over from another family
    /// are dropped.
    pub fn new(mut members: Vec<Person>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for person in &members {
            if !seen.insert(person.name.as_str()) {
                return Err(ConfigError::DuplicatePerson(person.name.clone()));
            }
        }
        for person in &mut members {
            person.spouse = None;
        }
        Ok(Self { members })
    }

    /// Link two members as spouses (sets both directions)
    ///
    /// Re-linking an existing couple is a no-op; linking someone who already
    /// has a different spouse is an error.
    pub fn marry(&mut self, a: PersonId, b: PersonId) -> Result<(), ConfigError> {
        let (name_a, name_b) = (self.person(a).name.clone(), self.person(b).name.clone());
        if a == b {
            return Err(ConfigError::SelfSpouse(name_a));
        }

        for (id, other) in [(a, b), (b, a)] {
            if let Some(existing) = self.person(id).spouse {
                if existing != other {
                    return Err(ConfigError::AlreadyMarried {
                        person: self.person(id).name.clone(),
                        spouse: self.person(existing).name.clone(),
                    });
                }
            }
        }

        self.members[a.0].spouse = Some(b);
        self.members[b.0].spouse = Some(a);
        log::debug!("{name_a} and {name_b} are spouses");
        Ok(())
    }

    /// Link two members by name
    pub fn marry_by_name(&mut self, a: &str, b: &str) -> Result<(), ConfigError> {
        let a = self.require(a)?;
        let b = self.require(b)?;
        self.marry(a, b)
    }

    pub fn find(&self, name: &str) -> Option<PersonId> {
        self.members.iter().position(|p| p.name == name).map(PersonId)
    }

    /// Like [`Family::find`] but an unknown name is a configuration error
    pub fn require(&self, name: &str) -> Result<PersonId, ConfigError> {
        self.find(name)
            .ok_or_else(|| ConfigError::UnknownPerson(name.to_string()))
    }

    /// Panics if `id` did not come from this family
    pub fn person(&self, id: PersonId) -> &Person {
        &self.members[id.0]
    }

    pub fn spouse_of(&self, id: PersonId) -> Option<&Person> {
        self.person(id).spouse.map(|s| self.person(s))
    }

    pub fn iter(&self) -> impl Iterator<Item = (PersonId, &Person)> {
        self.members.iter().enumerate().map(|(i, p)| (PersonId(i), p))
    }

    pub fn ids(&self) -> impl Iterator<Item = PersonId> {
        (0..self.members.len()).map(PersonId)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// True when any member has a spouse (selects joint tax brackets)
    pub fn is_married(&self) -> bool {
        self.members.iter().any(|p| p.spouse.is_some())
    }

    /// Ages of every member in `year`, in family order
    pub fn ages(&self, year: i32) -> Vec<i32> {
        self.members.iter().map(|p| p.age(year)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SS: [f64; 9] = [1000.0; 9];

    fn person(name: &str) -> Person {
        Person::new(name, "1970-01-01", 50_000.0, 65, 67, &SS).unwrap()
    }

    #[test]
    fn test_marriage_is_symmetric() {
        let mut family = Family::new(vec![person("Joe"), person("Jane"), person("Kid")]).unwrap();
        assert!(!family.is_married());

        family.marry_by_name("Jane", "Joe").unwrap();
        assert_eq!(family.person(PersonId(0)).spouse(), Some(PersonId(1)));
        assert_eq!(family.person(PersonId(1)).spouse(), Some(PersonId(0)));
        assert_eq!(family.spouse_of(PersonId(0)).map(|p| p.name.as_str()), Some("Jane"));
        assert!(family.spouse_of(PersonId(2)).is_none());
        assert!(family.is_married());

        // marrying the same couple again is fine
        family.marry(PersonId(0), PersonId(1)).unwrap();
    }

    #[test]
    fn test_only_one_spouse() {
        let mut family = Family::new(vec![person("Joe"), person("Jane"), person("Kid")]).unwrap();
        family.marry_by_name("Joe", "Jane").unwrap();

        let err = family.marry_by_name("Kid", "Joe").unwrap_err();
        assert!(matches!(err, ConfigError::AlreadyMarried { .. }));
        assert_eq!(family.person(PersonId(2)).spouse(), None);

        let err = family.marry_by_name("Kid", "Kid").unwrap_err();
        assert!(matches!(err, ConfigError::SelfSpouse(_)));
    }

    #[test]
    fn test_new_family_drops_foreign_spouse_links() {
        let mut couple = Family::new(vec![person("Joe"), person("Jane")]).unwrap();
        couple.marry_by_name("Joe", "Jane").unwrap();

        // Only Jane moves over; her link to Joe must not survive
        let jane = couple.person(PersonId(1)).clone();
        let family = Family::new(vec![person("Kid"), jane]).unwrap();
        assert_eq!(family.person(PersonId(1)).spouse(), None);
        assert!(!family.is_married());
    }

    #[test]
    fn test_lookup_errors() {
        let family = Family::new(vec![person("Joe")]).unwrap();
        assert_eq!(family.find("Joe"), Some(PersonId(0)));
        assert!(matches!(family.require("Bob"), Err(ConfigError::UnknownPerson(_))));

        let err = Family::new(vec![person("Joe"), person("Joe")]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicatePerson(_)));
    }

    #[test]
    fn test_ages() {
        let family = Family::new(vec![person("Joe"), person("Jane")]).unwrap();
        assert_eq!(family.ages(2025), vec![55, 55]);
        assert_eq!(family.len(), 2);
        assert_eq!(family.ids().collect::<Vec<_>>(), vec![PersonId(0), PersonId(1)]);
    }
}
