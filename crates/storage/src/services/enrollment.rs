use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::StorageError;
use crate::models::Athlete;
use crate::repository::competition::CompetitionRepository;
use crate::repository::roster::Roster;
use crate::store::KeyValueStore;

pub const ENROLLMENT_FAILED_MESSAGE: &str = "Unable to complete enrollment.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EnrollmentRequest {
    pub user_id: String,
    pub competition_id: String,
    /// Raw division index; anything below 1 is treated as 1
    pub division_index: i64,
    pub box_name: String,
}

#[derive(Debug, Error)]
pub enum EnrollmentError {
    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Box name is required")]
    MissingBoxName,

    #[error("Unknown competition: {0}")]
    UnknownCompetition(String),

    #[error("Competition {competition_id} has no division {division_index}")]
    UnknownDivision {
        competition_id: String,
        division_index: u32,
    },

    #[error("Division {division_index} of {competition_id} is full")]
    DivisionFull {
        competition_id: String,
        division_index: u32,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Enrolls users into competition divisions.
///
/// All checks run before anything is written. The division counter and the
/// roster are then updated together; if the roster write fails the counter
/// is put back.
pub struct EnrollmentService<'a, C, R> {
    competitions: &'a mut CompetitionRepository<C>,
    roster: &'a mut Roster<R>,
}

impl<'a, C: KeyValueStore, R: KeyValueStore> EnrollmentService<'a, C, R> {
    pub fn new(competitions: &'a mut CompetitionRepository<C>, roster: &'a mut Roster<R>) -> Self {
        Self {
            competitions,
            roster,
        }
    }

    pub fn enroll(&mut self, request: &EnrollmentRequest) -> Result<Athlete, EnrollmentError> {
        let user = self
            .roster
            .find_user(&request.user_id)
            .ok_or_else(|| EnrollmentError::UnknownUser(request.user_id.clone()))?;
        let name = user.full_name();

        let box_name = request.box_name.trim();
        if box_name.is_empty() {
            return Err(EnrollmentError::MissingBoxName);
        }

        let competition = self
            .competitions
            .find(&request.competition_id)
            .ok_or_else(|| EnrollmentError::UnknownCompetition(request.competition_id.clone()))?;

        let division_index = floor_index(request.division_index);
        let division = competition.division(division_index).ok_or_else(|| {
            EnrollmentError::UnknownDivision {
                competition_id: competition.id.clone(),
                division_index,
            }
        })?;
        if division.is_full() {
            return Err(EnrollmentError::DivisionFull {
                competition_id: competition.id.clone(),
                division_index,
            });
        }

        let athlete = Athlete {
            id: format!("ath-{}", Uuid::new_v4()),
            user_id: request.user_id.clone(),
            competition_id: competition.id.clone(),
            division_index,
            name,
            box_name: box_name.to_string(),
        };

        self.competitions
            .increment_enrollment(&athlete.competition_id, division_index)?;
        if let Err(err) = self.roster.prepend(athlete.clone()) {
            warn!(
                error = %err,
                competition = %athlete.competition_id,
                "Roster write failed, reverting enrollment"
            );
            self.competitions
                .revert_enrollment(&athlete.competition_id, division_index)?;
            return Err(err.into());
        }

        info!(
            athlete = %athlete.id,
            user = %athlete.user_id,
            competition = %athlete.competition_id,
            division = division_index,
            "Athlete enrolled"
        );
        self.competitions
            .notifications()
            .success(format!("{} enrolled as \"{}\".", athlete.name, athlete.box_name));
        Ok(athlete)
    }

    /// Boolean form of [`Self::enroll`]; `false` means nothing changed apart
    /// from an error toast
    pub fn add_athlete(
        &mut self,
        user_id: &str,
        competition_id: &str,
        division_index: i64,
        box_name: &str,
    ) -> bool {
        let request = EnrollmentRequest {
            user_id: user_id.to_string(),
            competition_id: competition_id.to_string(),
            division_index,
            box_name: box_name.to_string(),
        };

        match self.enroll(&request) {
            Ok(_) => true,
            Err(err) => {
                warn!(error = %err, "Enrollment rejected");
                self.competitions
                    .notifications()
                    .error(ENROLLMENT_FAILED_MESSAGE);
                false
            }
        }
    }
}

fn floor_index(index: i64) -> u32 {
    u32::try_from(index.max(1)).unwrap_or(u32::MAX)
}
