pub mod form;
pub mod profile;
pub mod storage;
