use std::sync::{Arc, OnceLock};

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;
use uuid::Uuid;

use shared_database::Store;
use shared_models::appointment::{Appointment, AppointmentFilter};

use crate::models::{AvailabilityError, DoctorError, SlotAvailability};

const TIMING_PATTERN: &str = r"(?i)^\s*(\d{1,2})\s*(AM|PM)\s*-\s*(\d{1,2})\s*(AM|PM)\s*$";

fn timing_regex() -> Option<&'static Regex> {
    static TIMING: OnceLock<Option<Regex>> = OnceLock::new();
    TIMING.get_or_init(|| Regex::new(TIMING_PATTERN).ok()).as_ref()
}

/// Consultation window in 24-hour numbering, end exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsultationHours {
    pub start_hour: u32,
    pub end_hour: u32,
}

/// Parses `"<h><AM|PM>-<h><AM|PM>"` with hours 1 to 12.
pub fn parse_consultation_timing(timing: &str) -> Result<ConsultationHours, AvailabilityError> {
    let parse_error = || AvailabilityError::ParseError(timing.to_string());

    let captures = timing_regex()
        .and_then(|re| re.captures(timing))
        .ok_or_else(parse_error)?;

    let hour = |index: usize| -> Result<u32, AvailabilityError> {
        let value: u32 = captures[index].parse().map_err(|_| parse_error())?;
        if (1..=12).contains(&value) {
            Ok(value)
        } else {
            Err(parse_error())
        }
    };

    let start_hour = to_24_hour(hour(1)?, &captures[2]);
    let end_hour = to_24_hour(hour(3)?, &captures[4]);

    Ok(ConsultationHours { start_hour, end_hour })
}

/// 12AM is midnight, 12PM is noon, other PM hours shift by twelve.
fn to_24_hour(hour: u32, meridiem: &str) -> u32 {
    let is_pm = meridiem.eq_ignore_ascii_case("PM");
    match (hour, is_pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    }
}

/// One-hour labels `"{h}-{h+1}"` for every hour in the window. Empty when the
/// window does not move forward.
pub fn generate_slots(hours: &ConsultationHours) -> Vec<String> {
    (hours.start_hour..hours.end_hour)
        .map(|h| format!("{}-{}", h, h + 1))
        .collect()
}

pub fn slots_for(timing: &str) -> Result<Vec<String>, AvailabilityError> {
    parse_consultation_timing(timing).map(|hours| generate_slots(&hours))
}

/// True for labels shaped like a generated slot, e.g. `"9-10"` or `"23-24"`.
pub fn is_slot_label(label: &str) -> bool {
    let Some((start, end)) = label.split_once('-') else {
        return false;
    };
    match (start.parse::<u32>(), end.parse::<u32>()) {
        (Ok(start), Ok(end)) => start < 24 && end == start + 1 && label == format!("{}-{}", start, end),
        _ => false,
    }
}

/// Marks each slot booked when a slot-holding appointment matches it on `date`.
pub fn mark_booked(slots: Vec<String>, date: NaiveDate, appointments: &[Appointment]) -> Vec<SlotAvailability> {
    slots
        .into_iter()
        .map(|slot| {
            let booking = appointments
                .iter()
                .find(|a| a.occupies_slot() && a.checkup_timing == slot && a.date == date);
            SlotAvailability {
                is_booked: booking.is_some(),
                date: booking.map_or(date, |a| a.date),
                slot_timing: slot,
            }
        })
        .collect()
}

pub struct AvailabilityService {
    store: Arc<dyn Store>,
}

impl AvailabilityService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Slots for `doctor_id` on `date`, recomputed from stored state on every call.
    pub async fn get_slot_availability(
        &self,
        doctor_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<SlotAvailability>, DoctorError> {
        let profile = self
            .store
            .get_doctor_profile(doctor_id)
            .await?
            .ok_or(DoctorError::NotFound)?;

        let slots = slots_for(&profile.consultation_timing)?;

        let appointments = self
            .store
            .list_appointments(&AppointmentFilter::for_doctor(doctor_id).on_date(date))
            .await?;

        debug!(
            "Doctor {} has {} slots and {} appointments on {}",
            doctor_id,
            slots.len(),
            appointments.len(),
            date
        );

        Ok(mark_booked(slots, date, &appointments))
    }
}
