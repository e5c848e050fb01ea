pub mod banner;
pub mod user;
pub mod vehicle;
