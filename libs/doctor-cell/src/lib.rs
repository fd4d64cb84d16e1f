pub mod handlers;
pub mod models;
pub mod router;
pub mod services;

pub use models::*;
pub use router::doctor_routes;
pub use services::availability::{generate_slots, is_slot_label, parse_consultation_timing, slots_for, ConsultationHours};
