pub mod error;
pub mod registration;
pub mod repository;
