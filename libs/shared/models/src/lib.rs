pub mod appointment;
pub mod auth;
pub mod booking;
pub mod error;
pub mod pagination;
pub mod prescription;
pub mod profile;
pub mod response;
pub mod user;
