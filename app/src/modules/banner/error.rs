use sea_orm::DbErr;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BannerError {
    #[error("banner template image not found at {0}")]
    TemplateMissing(PathBuf),

    #[error("failed to generate banner for vehicle {identifier}: {source}")]
    Generation {
        identifier: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("no vehicle found for {0}")]
    VehicleNotFound(String),

    #[error("vehicle {identifier} already has an active banner (id {banner_id})")]
    AlreadyActive { identifier: String, banner_id: i32 },

    #[error("banner {0} not found")]
    NotFound(i32),

    #[error(transparent)]
    Db(#[from] DbErr),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
