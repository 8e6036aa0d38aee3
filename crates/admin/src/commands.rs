use anyhow::{Context, Result, anyhow};
use mockable::Clock;
use serde::Serialize;
use serde_json::{Value, json};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use storage::dto::common::{PaginatedResponse, PaginationParams, page_items};
use storage::dto::competition::{
    CompetitionFilter, CompetitionForm, CompetitionStats, DivisionInput,
};
use storage::dto::product::{InventoryStats, ProductFilter, ProductForm};
use storage::models::Division;
use storage::repository::competition::CompetitionRepository;
use storage::repository::inventory::InventoryRepository;
use storage::repository::roster::Roster;
use storage::services::enrollment::{EnrollmentRequest, EnrollmentService};
use storage::services::normalization::{append_division, remove_division};
use storage::services::notification::Toast;
use storage::store::{
    AthleteSchema, CompetitionSchema, FileStore, PersistentCollection, ProductSchema,
    StoreNamespace,
};
use tracing::info;

use crate::cli::{CollectionArg, Commands, CompetitionCommand, PageArgs, ProductCommand};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Dashboard {
    competitions: CompetitionStats,
    inventory: InventoryStats,
    athletes: usize,
}

/// Every repository opened over one data directory
pub struct App {
    competitions: CompetitionRepository<FileStore>,
    inventory: InventoryRepository<FileStore>,
    roster: Roster<FileStore>,
}

impl App {
    pub fn open(data_dir: &Path, clock: Arc<dyn Clock>) -> Result<Self> {
        let store = FileStore::new(data_dir);
        info!(data_dir = %data_dir.display(), "Opening data directory");

        Ok(Self {
            competitions: CompetitionRepository::open(
                store.clone(),
                StoreNamespace::competitions(),
                clock.clone(),
            )
            .context("Failed to open competitions")?,
            inventory: InventoryRepository::open(store.clone(), StoreNamespace::products(), clock)
                .context("Failed to open inventory")?,
            roster: Roster::open(store, StoreNamespace::athletes())
                .context("Failed to open athlete roster")?,
        })
    }

    /// Notifications raised by the last command
    pub fn toasts(&mut self) -> Vec<Toast> {
        let mut toasts = self.competitions.toasts().to_vec();
        toasts.extend_from_slice(self.inventory.toasts());
        toasts
    }

    pub fn run(&mut self, command: Commands) -> Result<Value> {
        match command {
            Commands::Stats => to_json(&Dashboard {
                competitions: self.competitions.stats(),
                inventory: self.inventory.stats(),
                athletes: self.roster.athletes().len(),
            }),
            Commands::Competitions(command) => self.run_competition(command),
            Commands::Enroll {
                user,
                competition,
                division,
                box_name,
            } => {
                let request = EnrollmentRequest {
                    user_id: user,
                    competition_id: competition,
                    division_index: division,
                    box_name,
                };
                let athlete = EnrollmentService::new(&mut self.competitions, &mut self.roster)
                    .enroll(&request)
                    .context("Enrollment rejected")?;
                to_json(&athlete)
            }
            Commands::Users {
                search,
                competition,
                division,
            } => {
                let users = match competition {
                    Some(id) => self.roster.competition_users(&id, division, &search),
                    None => self.roster.search_users(&search),
                };
                let rows: Vec<Value> = users
                    .into_iter()
                    .map(|user| {
                        json!({
                            "user": user,
                            "summary": self.roster.user_summary(&user.id),
                        })
                    })
                    .collect();
                Ok(Value::Array(rows))
            }
            Commands::Athletes {
                competition,
                division,
            } => to_json(&self.roster.athletes_for(&competition, division)),
            Commands::Products(command) => self.run_product(command),
            Commands::Reset { .. } => Err(anyhow!("Reset runs before repositories are opened")),
        }
    }

    fn run_competition(&mut self, command: CompetitionCommand) -> Result<Value> {
        match command {
            CompetitionCommand::List {
                page,
                search,
                category,
            } => {
                let filter = CompetitionFilter { search, category };
                page_json(self.competitions.list(&filter, &pagination(page)?))
            }
            CompetitionCommand::Show { id } => {
                let competition = self
                    .competitions
                    .find(&id)
                    .ok_or_else(|| anyhow!("Competition {} not found", id))?;
                to_json(competition)
            }
            CompetitionCommand::Add { form } => {
                let form: CompetitionForm = read_json(&form)?;
                let competition = self.competitions.add(&form)?;
                to_json(&competition)
            }
            CompetitionCommand::Delete { id } => {
                let removed = self.competitions.delete(&id)?;
                to_json(&removed)
            }
            CompetitionCommand::Divisions { id, file } => {
                let divisions: Vec<DivisionInput> = read_json(&file)?;
                self.replace_divisions(&id, &divisions)
            }
            CompetitionCommand::AddDivision { id } => {
                let divisions = append_division(&self.current_divisions(&id)?);
                self.replace_divisions(&id, &division_inputs(&divisions))
            }
            CompetitionCommand::RemoveDivision { id, position } => {
                let position = position
                    .checked_sub(1)
                    .ok_or_else(|| anyhow!("Division positions start at 1"))?;
                let divisions = remove_division(&self.current_divisions(&id)?, position);
                self.replace_divisions(&id, &division_inputs(&divisions))
            }
        }
    }

    fn run_product(&mut self, command: ProductCommand) -> Result<Value> {
        match command {
            ProductCommand::List {
                page,
                search,
                category,
            } => {
                let filter = ProductFilter { search, category };
                page_json(self.inventory.list(&filter, &pagination(page)?))
            }
            ProductCommand::Add {
                name,
                sku,
                category,
                price,
                quantity,
                low_stock_threshold,
            } => {
                let form = ProductForm {
                    name,
                    sku,
                    category,
                    price,
                    quantity,
                    low_stock_threshold,
                };
                to_json(&self.inventory.add(&form)?)
            }
            ProductCommand::Delete { id } => to_json(&self.inventory.delete(&id)?),
            ProductCommand::Adjust { id, delta } => {
                to_json(&self.inventory.adjust_quantity(&id, delta)?)
            }
            ProductCommand::Set { id, quantity } => {
                to_json(&self.inventory.set_quantity(&id, quantity)?)
            }
        }
    }

    fn current_divisions(&self, id: &str) -> Result<Vec<Division>> {
        self.competitions
            .find(id)
            .map(|c| c.divisions.clone())
            .ok_or_else(|| anyhow!("Competition {} not found", id))
    }

    fn replace_divisions(&mut self, id: &str, divisions: &[DivisionInput]) -> Result<Value> {
        if !self.competitions.update_divisions(id, divisions)? {
            return Err(anyhow!("Competition {} not found", id));
        }
        to_json(&self.competitions.find(id))
    }
}

/// Overwrites the chosen collections with the seed without loading them first
pub fn reset(data_dir: &Path, collection: CollectionArg) -> Result<Value> {
    let store = FileStore::new(data_dir);
    let mut counts = serde_json::Map::new();

    if matches!(collection, CollectionArg::Competitions | CollectionArg::All) {
        let seeded = PersistentCollection::<_, CompetitionSchema>::new(
            store.clone(),
            StoreNamespace::competitions(),
        )
        .reset()?;
        counts.insert("competitions".to_string(), json!(seeded.len()));
    }
    if matches!(collection, CollectionArg::Products | CollectionArg::All) {
        let seeded =
            PersistentCollection::<_, ProductSchema>::new(store.clone(), StoreNamespace::products())
                .reset()?;
        counts.insert("products".to_string(), json!(seeded.len()));
    }
    if matches!(collection, CollectionArg::Athletes | CollectionArg::All) {
        let seeded =
            PersistentCollection::<_, AthleteSchema>::new(store, StoreNamespace::athletes())
                .reset()?;
        counts.insert("athletes".to_string(), json!(seeded.len()));
    }

    info!(?collection, "Storage reset to seed data");
    Ok(Value::Object(counts))
}

fn division_inputs(divisions: &[Division]) -> Vec<DivisionInput> {
    divisions.iter().map(DivisionInput::from).collect()
}

fn pagination(args: PageArgs) -> Result<PaginationParams> {
    let params = PaginationParams::new(args.page, args.page_size);
    params.validate().map_err(|e| anyhow!(e))?;
    Ok(params)
}

fn page_json<T: Serialize>(page: PaginatedResponse<T>) -> Result<Value> {
    let pages = page_items(page.pagination.page, page.pagination.total_pages);
    Ok(json!({
        "data": page.data,
        "pagination": page.pagination,
        "pages": pages,
    }))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("Cannot read {}", path.display()))?;
    serde_json::from_str(&contents).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}
