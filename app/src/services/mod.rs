pub mod storage;
pub mod urls;
