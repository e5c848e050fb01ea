pub mod artifact;
pub mod error;
pub mod repository;
pub mod service;
