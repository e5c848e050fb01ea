use super::artifact::BannerArtifactBuilder;
use super::error::BannerError;
use super::repository;
use crate::config::app_config;
use crate::modules::vehicle::registry;
use crate::services::storage::{ArtifactKey, ArtifactStorage};
use crate::services::urls::UrlBuilder;
use entity::identification_banner;
use entity::vehicle_kind::dir_component_for_tag;
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Storage key for a vehicle banner, nested by kind and identifier so the
/// media tree stays browsable by hand. Files of rows with an unrecognized
/// kind tag land under the `outro` directory.
pub fn banner_artifact_key(kind_tag: &str, identifier: &str, plate: &str) -> ArtifactKey {
    ArtifactKey {
        folder: format!(
            "banners_identificacao/veiculo/{}/{}",
            dir_component_for_tag(kind_tag),
            identifier
        ),
        filename: format!("banner_{}_{}.png", identifier, plate),
    }
}

/// Owns the identification banner lifecycle: creating rows for vehicles,
/// rendering and storing their artifacts, and cleaning up files on
/// regeneration and deletion.
pub struct BannerService {
    db: DatabaseConnection,
    storage: ArtifactStorage,
    urls: UrlBuilder,
    artifacts: BannerArtifactBuilder,
    regeneration_locks: Mutex<HashMap<i32, Arc<tokio::sync::Mutex<()>>>>,
}

impl BannerService {
    pub fn new(
        db: DatabaseConnection,
        storage: ArtifactStorage,
        urls: UrlBuilder,
        artifacts: BannerArtifactBuilder,
    ) -> Self {
        BannerService {
            db,
            storage,
            urls,
            artifacts,
            regeneration_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn from_config(db: DatabaseConnection) -> Self {
        let config = app_config();

        let mut artifacts = BannerArtifactBuilder::new(config.banner_template.clone());
        if let Some(font_path) = &config.banner_font {
            artifacts = artifacts.with_font(BannerArtifactBuilder::load_font(font_path));
        }

        Self::new(
            db,
            ArtifactStorage::new(config.media_root.clone()),
            UrlBuilder::new(config.site_url.clone()),
            artifacts,
        )
    }

    /// Creates (or reactivates) the banner for the vehicle with the given
    /// identifier and renders its artifact.
    ///
    /// A vehicle can hold at most one active banner, a second request fails
    /// with [`BannerError::AlreadyActive`] instead of replacing it.
    pub async fn create_for_identifier(
        &self,
        identifier: &str,
    ) -> Result<identification_banner::Model, BannerError> {
        let vehicle = registry::find_vehicle_by_identifier(&self.db, identifier)
            .await?
            .ok_or_else(|| BannerError::VehicleNotFound(identifier.to_string()))?;

        let existing =
            repository::find_by_vehicle(&self.db, vehicle.kind(), vehicle.identifier()).await?;

        if let Some(existing) = &existing {
            if existing.active {
                return Err(BannerError::AlreadyActive {
                    identifier: identifier.to_string(),
                    banner_id: existing.id,
                });
            }
        }

        // a banner of some deleted vehicle may still hold this vehicle's
        // recycled numeric id, blocking the (kind, id) reference pair
        let stale =
            repository::find_by_vehicle_pair(&self.db, vehicle.kind(), vehicle.id()).await?;

        if let Some(stale) = stale {
            if existing.as_ref().map(|banner| banner.id) != Some(stale.id) {
                warn!(
                    "[BANNER] banner {} holds the recycled numeric id of vehicle {}, deactivating it",
                    stale.id, identifier
                );
                repository::deactivate_releasing_pair(&self.db, stale).await?;
            }
        }

        let row = match existing {
            Some(inactive) => {
                info!(
                    "[BANNER] reactivating banner {} for vehicle {}",
                    inactive.id, identifier
                );
                repository::reactivate(&self.db, inactive, &vehicle).await?
            }
            None => repository::create_for_vehicle(&self.db, &vehicle).await?,
        };

        self.generate(row.id).await
    }

    /// Renders the artifact for a banner and stores it, updating the row
    /// with the file path and encoded QR URL.
    ///
    /// Stale vehicle references are reconciled first, so the artifact always
    /// reflects the vehicle's current identifier and plate.
    pub async fn generate(
        &self,
        banner_id: i32,
    ) -> Result<identification_banner::Model, BannerError> {
        let banner = repository::find_by_id(&self.db, banner_id)
            .await?
            .ok_or(BannerError::NotFound(banner_id))?;

        let (banner, vehicle) = repository::reconcile_references(&self.db, banner).await?;

        let Some(vehicle) = vehicle else {
            return Err(BannerError::VehicleNotFound(banner_reference(&banner)));
        };

        let qr_url = self.urls.vehicle_info_url(vehicle.identifier());
        let bytes = self
            .artifacts
            .render(vehicle.identifier(), vehicle.plate(), &qr_url)?;

        let key = banner_artifact_key(&banner.vehicle_kind, vehicle.identifier(), vehicle.plate());
        let file_path = String::from(key);

        self.storage.upload(file_path.clone(), bytes).await?;

        Ok(repository::update_artifact(&self.db, banner, &file_path, &qr_url).await?)
    }

    /// Re-renders a banner's artifact, deleting the previous file when the
    /// vehicle data moved it to a new path.
    ///
    /// Concurrent regenerations of the same banner are serialized through a
    /// per banner lock, so two callers cannot interleave their render,
    /// upload and delete steps.
    pub async fn regenerate(
        &self,
        banner_id: i32,
    ) -> Result<identification_banner::Model, BannerError> {
        let lock = self.regeneration_lock(banner_id);
        let _guard = lock.lock().await;

        let banner = repository::find_by_id(&self.db, banner_id)
            .await?
            .ok_or(BannerError::NotFound(banner_id))?;
        let old_file = banner.file_path.clone();

        let updated = self.generate(banner_id).await?;

        if let Some(old_file) = old_file {
            if updated.file_path.as_deref() != Some(old_file.as_str()) {
                // removal of the replaced file is best effort, the new
                // artifact is already stored and referenced by the row
                let _ = self.storage.delete(old_file).await;
            }
        }

        Ok(updated)
    }

    /// Deletes a banner row and its stored artifact.
    pub async fn delete(&self, banner_id: i32) -> Result<(), BannerError> {
        let banner = repository::find_by_id(&self.db, banner_id)
            .await?
            .ok_or(BannerError::NotFound(banner_id))?;

        repository::delete_by_id(&self.db, banner.id).await?;

        if let Some(file_path) = banner.file_path {
            let _ = self.storage.delete(file_path).await;
        }

        Ok(())
    }

    /// Deletes a batch of banners, skipping ids that no longer exist, and
    /// returns how many rows were actually removed.
    pub async fn delete_many(&self, banner_ids: &[i32]) -> Result<usize, BannerError> {
        let mut deleted = 0;

        for banner_id in banner_ids {
            match self.delete(*banner_id).await {
                Ok(()) => deleted += 1,
                Err(BannerError::NotFound(_)) => {}
                Err(err) => return Err(err),
            }
        }

        Ok(deleted)
    }

    fn regeneration_lock(&self, banner_id: i32) -> Arc<tokio::sync::Mutex<()>> {
        let mut locks = self.regeneration_locks.lock().unwrap();
        locks.entry(banner_id).or_default().clone()
    }
}

/// Human readable description of whatever vehicle reference a banner holds,
/// for error messages about unresolvable rows.
fn banner_reference(banner: &identification_banner::Model) -> String {
    match (&banner.vehicle_identifier, banner.vehicle_id) {
        (Some(identifier), _) => format!("banner {} (vehicle {})", banner.id, identifier),
        (None, Some(vehicle_id)) => {
            format!("banner {} ({} id {})", banner.id, banner.vehicle_kind, vehicle_id)
        }
        (None, None) => format!("banner {} (no vehicle reference)", banner.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn artifact_key_follows_media_layout() {
        let key = banner_artifact_key("taxi", "AB3XY789", "ABC1234");

        assert_eq!(
            String::from(key),
            "banners_identificacao/veiculo/taxi/AB3XY789/banner_AB3XY789_ABC1234.png"
        );
    }

    #[test]
    fn unknown_kind_tags_store_under_outro() {
        let key = banner_artifact_key("carroca", "AB3XY789", "ABC1234");

        assert!(String::from(key).starts_with("banners_identificacao/veiculo/outro/"));
    }
}
