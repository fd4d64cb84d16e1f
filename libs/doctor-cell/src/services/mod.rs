pub mod availability;
pub mod catalogue;
pub mod doctor;
