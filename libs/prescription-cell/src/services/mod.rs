pub mod prescription;
