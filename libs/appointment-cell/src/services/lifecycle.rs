use tracing::{debug, warn};

use shared_models::appointment::AppointmentStatus;

use crate::models::AppointmentError;

/// Status transition rules. Unguarded unless built with `strict`, in which case
/// only the transitions from [`Self::get_valid_transitions`] are accepted.
pub struct AppointmentLifecycleService {
    strict: bool,
}

impl AppointmentLifecycleService {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    pub fn validate_status_transition(
        &self,
        current_status: AppointmentStatus,
        new_status: AppointmentStatus,
    ) -> Result<(), AppointmentError> {
        if !self.strict {
            return Ok(());
        }

        debug!("Validating status transition from {} to {}", current_status, new_status);

        if !Self::get_valid_transitions(current_status).contains(&new_status) {
            warn!("Invalid status transition attempted: {} -> {}", current_status, new_status);
            return Err(AppointmentError::InvalidStatusTransition {
                from: current_status,
                to: new_status,
            });
        }

        Ok(())
    }

    pub fn get_valid_transitions(current_status: AppointmentStatus) -> Vec<AppointmentStatus> {
        match current_status {
            AppointmentStatus::Pending => vec![
                AppointmentStatus::Accepted,
                AppointmentStatus::Rejected,
                AppointmentStatus::Success,
            ],
            // Paid, waiting for the doctor's decision.
            AppointmentStatus::Success => vec![AppointmentStatus::Accepted, AppointmentStatus::Rejected],
            AppointmentStatus::Accepted => vec![AppointmentStatus::Completed],
            AppointmentStatus::Rejected => vec![],
            AppointmentStatus::Completed => vec![],
        }
    }
}
