use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::models::{Athlete, User};
use crate::seed;
use crate::store::{AthleteSchema, KeyValueStore, PersistentCollection, StoreNamespace};

/// Per-user enrollment counts shown next to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub athlete_count: usize,
    pub competition_count: usize,
}

/// Registered users and the athletes they have been enrolled as.
///
/// Users come from the seed and are read-only; athletes are persisted.
pub struct Roster<S> {
    users: Vec<User>,
    athletes: Vec<Athlete>,
    collection: PersistentCollection<S, AthleteSchema>,
}

impl<S: KeyValueStore> Roster<S> {
    pub fn open(store: S, namespace: StoreNamespace) -> Result<Self> {
        let mut collection = PersistentCollection::new(store, namespace);
        let athletes = collection.load()?;
        collection.save(&athletes)?;

        Ok(Self {
            users: seed::users(),
            athletes,
            collection,
        })
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Newest enrollment first
    pub fn athletes(&self) -> &[Athlete] {
        &self.athletes
    }

    pub fn find_user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Users whose name or email contains `query`, sorted by full name
    pub fn search_users(&self, query: &str) -> Vec<&User> {
        let mut users: Vec<&User> = self.users.iter().filter(|u| u.matches(query)).collect();
        users.sort_by_cached_key(|u| u.full_name().to_lowercase());
        users
    }

    /// Athletes of a competition, optionally narrowed to one division
    pub fn athletes_for(&self, competition_id: &str, division_index: Option<u32>) -> Vec<&Athlete> {
        self.athletes
            .iter()
            .filter(|a| a.competition_id == competition_id)
            .filter(|a| division_index.is_none_or(|index| a.division_index == index))
            .collect()
    }

    /// Distinct users enrolled in a competition, in enrollment order
    pub fn competition_users(
        &self,
        competition_id: &str,
        division_index: Option<u32>,
        query: &str,
    ) -> Vec<&User> {
        let mut seen = HashSet::new();
        self.athletes_for(competition_id, division_index)
            .into_iter()
            .filter(|a| seen.insert(a.user_id.as_str()))
            .filter_map(|a| self.find_user(&a.user_id))
            .filter(|u| u.matches(query))
            .collect()
    }

    pub fn user_summary(&self, user_id: &str) -> UserSummary {
        let enrollments: Vec<&Athlete> = self
            .athletes
            .iter()
            .filter(|a| a.user_id == user_id)
            .collect();
        let competitions: HashSet<&str> = enrollments
            .iter()
            .map(|a| a.competition_id.as_str())
            .collect();

        UserSummary {
            athlete_count: enrollments.len(),
            competition_count: competitions.len(),
        }
    }

    /// Persists `athlete` at the head of the roster
    pub(crate) fn prepend(&mut self, athlete: Athlete) -> Result<()> {
        let mut next = Vec::with_capacity(self.athletes.len() + 1);
        next.push(athlete);
        next.extend(self.athletes.iter().cloned());

        self.collection.save(&next)?;
        debug!(count = next.len(), "Roster saved");
        self.athletes = next;
        Ok(())
    }
}
