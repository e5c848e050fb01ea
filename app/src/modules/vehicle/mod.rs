pub mod dto;
pub mod error;
pub mod identifier;
pub mod registry;
pub mod repository;
