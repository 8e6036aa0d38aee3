use std::sync::Arc;

use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::dto::common::{PaginatedResponse, PaginationParams};
use crate::dto::competition::{CompetitionFilter, CompetitionForm, CompetitionStats, DivisionInput};
use crate::error::{Result, StorageError};
use crate::models::{Competition, Division};
use crate::services::normalization::normalize_divisions;
use crate::services::notification::{Toast, ToastQueue};
use crate::store::{CompetitionSchema, KeyValueStore, PersistentCollection, StoreNamespace};

/// Repository for competitions kept in memory and mirrored to a key-value store.
///
/// Every mutation persists the whole collection before the in-memory copy is
/// replaced, so a failed write leaves both sides unchanged.
pub struct CompetitionRepository<S> {
    collection: PersistentCollection<S, CompetitionSchema>,
    competitions: Vec<Competition>,
    toasts: ToastQueue,
}

impl<S: KeyValueStore> CompetitionRepository<S> {
    /// Open the repository, loading (and if necessary repairing) storage
    pub fn open(store: S, namespace: StoreNamespace, clock: Arc<dyn Clock>) -> Result<Self> {
        Self::from_collection(PersistentCollection::new(store, namespace), clock)
    }

    /// Open over a collection built with a custom recovery policy
    pub fn from_collection(
        mut collection: PersistentCollection<S, CompetitionSchema>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let competitions = collection.load()?;
        collection.save(&competitions)?;

        Ok(Self {
            collection,
            competitions,
            toasts: ToastQueue::new(clock),
        })
    }

    /// Current snapshot, newest first
    pub fn competitions(&self) -> &[Competition] {
        &self.competitions
    }

    pub fn find(&self, id: &str) -> Option<&Competition> {
        self.competitions.iter().find(|c| c.id == id)
    }

    /// Filtered, paginated view of the collection
    pub fn list(
        &self,
        filter: &CompetitionFilter,
        params: &PaginationParams,
    ) -> PaginatedResponse<Competition> {
        let matching: Vec<Competition> = self
            .competitions
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        PaginatedResponse::paginate(matching, params)
    }

    pub fn stats(&self) -> CompetitionStats {
        CompetitionStats::from_competitions(&self.competitions)
    }

    /// Live notifications, expired ones pruned
    pub fn toasts(&mut self) -> &[Toast] {
        self.toasts.active()
    }

    pub fn notifications(&mut self) -> &mut ToastQueue {
        &mut self.toasts
    }

    /// Create a competition from a submitted form.
    ///
    /// An invalid form returns `StorageError::Validation` and changes nothing.
    pub fn add(&mut self, form: &CompetitionForm) -> Result<Competition> {
        let errors = form.validate_form();
        if !errors.is_empty() {
            return Err(StorageError::Validation(errors));
        }

        let competition = build_competition(form);

        let mut next = Vec::with_capacity(self.competitions.len() + 1);
        next.push(competition.clone());
        next.extend(self.competitions.iter().cloned());
        self.commit(next)?;

        info!(id = %competition.id, name = %competition.name, "Competition added");
        self.toasts.success(format!("\"{}\" added.", competition.name));
        Ok(competition)
    }

    /// Delete a competition by ID. Unknown IDs are a no-op.
    ///
    /// Athletes enrolled in the competition are left in place.
    pub fn delete(&mut self, id: &str) -> Result<Option<Competition>> {
        let Some(target) = self.find(id).cloned() else {
            return Ok(None);
        };

        let next = self
            .competitions
            .iter()
            .filter(|c| c.id != id)
            .cloned()
            .collect();
        self.commit(next)?;

        info!(id = %target.id, name = %target.name, "Competition removed");
        self.toasts.success(format!("\"{}\" removed.", target.name));
        Ok(Some(target))
    }

    /// Replace a competition's divisions with the normalized input.
    ///
    /// Returns `false` without writing or notifying when the ID is unknown.
    pub fn update_divisions(&mut self, id: &str, divisions: &[DivisionInput]) -> Result<bool> {
        let raw = serde_json::Value::Array(divisions.iter().map(DivisionInput::to_raw).collect());
        let normalized = normalize_divisions(&raw);

        let Some(position) = self.competitions.iter().position(|c| c.id == id) else {
            return Ok(false);
        };

        let mut next = self.competitions.clone();
        next[position].divisions = normalized;
        let name = next[position].name.clone();
        self.commit(next)?;

        info!(id = %id, "Competition divisions updated");
        self.toasts.success(format!("\"{}\" divisions updated.", name));
        Ok(true)
    }

    /// Bumps a division's enrolled count by one, capped at capacity
    pub(crate) fn increment_enrollment(
        &mut self,
        id: &str,
        division_index: u32,
    ) -> Result<Division> {
        self.adjust_enrollment(id, division_index, |division| {
            division.enrolled_athletes = division
                .enrolled_athletes
                .saturating_add(1)
                .min(division.max_athletes);
        })
    }

    /// Undoes [`Self::increment_enrollment`] when the second half of an enrollment fails
    pub(crate) fn revert_enrollment(
        &mut self,
        id: &str,
        division_index: u32,
    ) -> Result<Division> {
        self.adjust_enrollment(id, division_index, |division| {
            division.enrolled_athletes = division.enrolled_athletes.saturating_sub(1);
        })
    }

    fn adjust_enrollment(
        &mut self,
        id: &str,
        division_index: u32,
        adjust: impl FnOnce(&mut Division),
    ) -> Result<Division> {
        let mut next = self.competitions.clone();
        let division = next
            .iter_mut()
            .find(|c| c.id == id)
            .and_then(|c| c.division_mut(division_index))
            .ok_or(StorageError::NotFound)?;
        adjust(division);
        let updated = division.clone();

        self.commit(next)?;
        Ok(updated)
    }

    fn commit(&mut self, next: Vec<Competition>) -> Result<()> {
        self.collection.save(&next)?;
        self.competitions = next;
        Ok(())
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn optional_date(value: &str) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn build_competition(form: &CompetitionForm) -> Competition {
    let raw = serde_json::Value::Array(form.divisions.iter().map(DivisionInput::to_raw).collect());

    Competition {
        id: format!("comp-{}", Uuid::new_v4()),
        name: form.name.trim().to_string(),
        sku: form.sku.trim().to_uppercase(),
        category: form.category,
        price: form.price_value(),
        vat: form.vat_value(),
        enrollment_type: form.enrollment_type,
        organizer: form.organizer.trim().to_string(),
        sport: form.sport.trim().to_string(),
        team_size: form.team_size_value(),
        status: form.status,
        enrollment_open: form.enrollment_open,
        enrollment_period_start: optional_date(&form.enrollment_period_start),
        enrollment_period_end: optional_date(&form.enrollment_period_end),
        visibility: form.visibility,
        start_date: optional_date(&form.start_date),
        end_date: optional_date(&form.end_date),
        description: optional(&form.description),
        divisions: normalize_divisions(&raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CompetitionCategory;
    use crate::seed;
    use crate::services::notification::test_clock::FixtureClock;
    use crate::store::MemoryStore;
    use rust_decimal::Decimal;

    fn open(store: MemoryStore) -> CompetitionRepository<MemoryStore> {
        CompetitionRepository::open(
            store,
            StoreNamespace::competitions(),
            Arc::new(FixtureClock::new()),
        )
        .unwrap()
    }

    fn run_form() -> CompetitionForm {
        CompetitionForm {
            name: "5K Run".to_string(),
            sku: "run-01".to_string(),
            price: "20".to_string(),
            organizer: "City Runners".to_string(),
            sport: "Running".to_string(),
            team_size: "1".to_string(),
            ..CompetitionForm::default()
        }
    }

    fn division(name: &str, index: i64, max: i64, enrolled: i64) -> DivisionInput {
        DivisionInput {
            name: name.to_string(),
            enrollment_open: true,
            max_athletes: max,
            enrolled_athletes: enrolled,
            fee: 10,
            team_size: 1,
            index,
        }
    }

    #[test]
    fn test_open_empty_store_loads_seed() {
        let repo = open(MemoryStore::new());
        assert_eq!(repo.competitions(), seed::competitions().as_slice());
    }

    #[test]
    fn test_add_competition() {
        let store = MemoryStore::new();
        let mut repo = open(store.clone());

        let competition = repo.add(&run_form()).unwrap();

        assert_eq!(competition.sku, "RUN-01");
        assert_eq!(competition.price, Decimal::from(20));
        assert!(competition.id.starts_with("comp-"));
        assert_eq!(repo.competitions()[0], competition);
        assert!(
            repo.toasts()
                .iter()
                .any(|toast| toast.message.contains("5K Run"))
        );

        // Persisted: a fresh repository over the same store sees it
        let reopened = open(store);
        assert_eq!(reopened.competitions()[0], competition);
    }

    #[test]
    fn test_add_collapses_blank_optionals() {
        let mut repo = open(MemoryStore::new());
        let competition = repo
            .add(&CompetitionForm {
                vat: "  ".to_string(),
                description: "  ".to_string(),
                start_date: "2026-07-01".to_string(),
                ..run_form()
            })
            .unwrap();

        assert_eq!(competition.vat, None);
        assert_eq!(competition.description, None);
        assert_eq!(competition.end_date, None);
        assert_eq!(competition.start_date, chrono::NaiveDate::from_ymd_opt(2026, 7, 1));
    }

    #[test]
    fn test_add_invalid_form_changes_nothing() {
        let store = MemoryStore::new();
        let mut repo = open(store.clone());
        let before = store.snapshot();

        let err = repo
            .add(&CompetitionForm {
                name: "".to_string(),
                ..run_form()
            })
            .unwrap_err();

        assert!(err.form_errors().unwrap().contains("name"));
        assert_eq!(repo.competitions().len(), seed::competitions().len());
        assert_eq!(store.snapshot(), before);
        assert!(repo.toasts().is_empty());
    }

    #[test]
    fn test_delete() {
        let mut repo = open(MemoryStore::new());

        let removed = repo.delete("comp-002").unwrap().unwrap();
        assert_eq!(removed.name, "Open Qualifier Online");
        assert!(repo.find("comp-002").is_none());
        assert_eq!(repo.toasts().len(), 1);

        assert!(repo.delete("comp-002").unwrap().is_none());
        assert_eq!(repo.toasts().len(), 1);
    }

    #[test]
    fn test_update_divisions_normalizes() {
        let mut repo = open(MemoryStore::new());

        let updated = repo
            .update_divisions(
                "comp-003",
                &[division("Second", 2, 4, 9), division("First", 1, 10, 0)],
            )
            .unwrap();

        assert!(updated);
        let divisions = &repo.find("comp-003").unwrap().divisions;
        assert_eq!(divisions[0].name, "First");
        assert_eq!(divisions[1].enrolled_athletes, 4);
        assert!(
            repo.toasts()
                .iter()
                .any(|t| t.message == "\"Community Row Challenge\" divisions updated.")
        );
    }

    #[test]
    fn test_update_divisions_unknown_id_is_silent() {
        let store = MemoryStore::new();
        let mut repo = open(store.clone());
        let before = store.snapshot();

        assert!(!repo.update_divisions("missing", &[division("A", 1, 1, 0)]).unwrap());
        assert!(repo.toasts().is_empty());
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_stats() {
        let mut repo = open(MemoryStore::new());
        let stats = repo.stats();
        assert_eq!(stats.total_competitions, 4);
        assert_eq!(stats.online_competitions, 2);
        assert_eq!(stats.live_competitions, 2);
        assert_eq!(stats.total_entry_fees, Decimal::from(185));

        repo.add(&run_form()).unwrap();
        let stats = repo.stats();
        assert_eq!(stats.total_competitions, 5);
        assert_eq!(stats.online_competitions, 3);
        assert_eq!(stats.total_entry_fees, Decimal::from(205));
    }

    #[test]
    fn test_list_filters_and_paginates() {
        let repo = open(MemoryStore::new());

        let live = repo.list(
            &CompetitionFilter {
                category: Some(CompetitionCategory::Live),
                ..Default::default()
            },
            &PaginationParams::default(),
        );
        assert_eq!(live.pagination.total_items, 2);

        let search = repo.list(
            &CompetitionFilter {
                search: Some("sts-".to_string()),
                ..Default::default()
            },
            &PaginationParams::default(),
        );
        assert_eq!(search.data.len(), 1);
        assert_eq!(search.data[0].id, "comp-004");

        let paged = repo.list(&CompetitionFilter::default(), &PaginationParams::new(2, 3));
        assert_eq!(paged.data.len(), 1);
        assert_eq!(paged.pagination.total_pages, 2);
    }

    #[test]
    fn test_increment_enrollment_caps_at_capacity() {
        let mut repo = open(MemoryStore::new());
        repo.update_divisions("comp-003", &[division("Solo", 1, 1, 0)])
            .unwrap();

        assert_eq!(repo.increment_enrollment("comp-003", 1).unwrap().enrolled_athletes, 1);
        assert_eq!(repo.increment_enrollment("comp-003", 1).unwrap().enrolled_athletes, 1);
        assert!(matches!(
            repo.increment_enrollment("comp-003", 9),
            Err(StorageError::NotFound)
        ));
    }
}
