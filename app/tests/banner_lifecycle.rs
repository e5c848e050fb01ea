use app::modules::banner::artifact::BannerArtifactBuilder;
use app::modules::banner::error::BannerError;
use app::modules::banner::repository as banner_repository;
use app::modules::banner::service::{banner_artifact_key, BannerService};
use app::modules::user::repository::{create_user, CreateUserDto};
use app::modules::vehicle::dto::{CreateMunicipalTransportDto, CreateVehicleDto};
use app::modules::vehicle::error::VehicleError;
use app::modules::vehicle::identifier::{IdentifierGenerator, MAX_GENERATION_ATTEMPTS};
use app::modules::vehicle::registry::{self, VehicleRef};
use app::modules::vehicle::repository as vehicle_repository;
use app::services::storage::ArtifactStorage;
use app::services::urls::UrlBuilder;
use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, IntoActiveModel, Set};
use std::path::PathBuf;
use tempfile::TempDir;
use url::Url;

async fn test_db() -> DatabaseConnection {
    // a single connection so every query hits the same in memory database
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1);

    let db = Database::connect(opt).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    db
}

struct TestContext {
    db: DatabaseConnection,
    service: BannerService,
    media: TempDir,
}

impl TestContext {
    fn artifact_path(&self, key: &str) -> PathBuf {
        self.media.path().join("media").join(key)
    }
}

async fn test_context() -> TestContext {
    let db = test_db().await;
    let media = tempfile::tempdir().unwrap();

    let template_path = media.path().join("template.png");
    image::RgbaImage::from_pixel(1200, 900, image::Rgba([255, 255, 255, 255]))
        .save(&template_path)
        .unwrap();

    let service = BannerService::new(
        db.clone(),
        ArtifactStorage::new(media.path().join("media")),
        UrlBuilder::new(Url::parse("http://localhost:8000").unwrap()),
        BannerArtifactBuilder::new(template_path),
    );

    TestContext { db, service, media }
}

fn seeded_generator(seed: u64) -> IdentifierGenerator {
    IdentifierGenerator::new(ChaCha8Rng::seed_from_u64(seed))
}

async fn create_driver(db: &DatabaseConnection, username: &str) -> entity::user::Model {
    create_user(
        db,
        &CreateUserDto {
            username: username.to_string(),
            email: format!("{}@example.com", username),
            cpf: None,
            is_superuser: false,
            groups: vec![String::from("TAXISTA")],
        },
    )
    .await
    .unwrap()
}

fn taxi_dto(user_id: i32, plate: &str) -> CreateVehicleDto {
    CreateVehicleDto {
        plate: plate.to_string(),
        renavam: format!("renavam-{}", plate),
        chassis_number: format!("chassis-{}", plate),
        brand: String::from("Fiat"),
        model: String::from("Uno"),
        color: String::from("Branco"),
        fabrication_year: 2018,
        fabrication_year_limit: 2028,
        user_id,
    }
}

async fn insert_taxi_with_identifier(
    db: &DatabaseConnection,
    user_id: i32,
    identifier: &str,
    plate: &str,
) -> entity::taxi_vehicle::Model {
    entity::taxi_vehicle::ActiveModel {
        created_at: Set(Utc::now()),
        identifier: Set(identifier.to_string()),
        plate: Set(plate.to_string()),
        renavam: Set(format!("renavam-{}", plate)),
        chassis_number: Set(format!("chassis-{}", plate)),
        brand: Set(String::from("Fiat")),
        model: Set(String::from("Uno")),
        color: Set(String::from("Branco")),
        fabrication_year: Set(2018),
        fabrication_year_limit: Set(2028),
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

async fn insert_banner_row(
    db: &DatabaseConnection,
    kind: &str,
    vehicle_id: Option<i32>,
    vehicle_identifier: Option<&str>,
) -> entity::identification_banner::Model {
    let now = Utc::now();

    entity::identification_banner::ActiveModel {
        created_at: Set(now),
        updated_at: Set(now),
        vehicle_kind: Set(kind.to_string()),
        vehicle_id: Set(vehicle_id),
        vehicle_identifier: Set(vehicle_identifier.map(String::from)),
        active: Set(true),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

#[tokio::test]
async fn creating_a_banner_renders_and_stores_its_artifact() {
    let ctx = test_context().await;

    let user = create_driver(&ctx.db, "driver1").await;
    let taxi = insert_taxi_with_identifier(&ctx.db, user.id, "AB3XY789", "ABC1234").await;

    let banner = ctx.service.create_for_identifier("AB3XY789").await.unwrap();

    assert!(banner.active);
    assert_eq!(banner.vehicle_kind, "taxi");
    assert_eq!(banner.vehicle_id, Some(taxi.id));
    assert_eq!(banner.vehicle_identifier.as_deref(), Some("AB3XY789"));

    assert_eq!(
        banner.file_path.as_deref(),
        Some("banners_identificacao/veiculo/taxi/AB3XY789/banner_AB3XY789_ABC1234.png")
    );

    assert_eq!(
        banner.qr_url.as_deref(),
        Some("http://localhost:8000/api/veiculos/veiculo/AB3XY789/info/")
    );

    assert!(ctx
        .artifact_path("banners_identificacao/veiculo/taxi/AB3XY789/banner_AB3XY789_ABC1234.png")
        .exists());
}

#[tokio::test]
async fn colliding_identifiers_are_retried_until_unique() {
    let ctx = test_context().await;
    let user = create_driver(&ctx.db, "driver1").await;

    let probe = seeded_generator(42);
    let first_draw = probe.next_identifier();
    let second_draw = probe.next_identifier();
    assert_ne!(first_draw, second_draw);

    let taxi_a = vehicle_repository::create_taxi(&ctx.db, &seeded_generator(42), &taxi_dto(user.id, "AAA1111"))
        .await
        .unwrap();
    let taxi_b = vehicle_repository::create_taxi(&ctx.db, &seeded_generator(42), &taxi_dto(user.id, "BBB2222"))
        .await
        .unwrap();

    assert_eq!(taxi_a.identifier, first_draw);
    assert_eq!(taxi_b.identifier, second_draw);
}

#[tokio::test]
async fn identifier_generation_gives_up_after_bounded_attempts() {
    let ctx = test_context().await;
    let user = create_driver(&ctx.db, "driver1").await;

    // occupy every identifier a generator with this seed will draw
    let probe = seeded_generator(7);
    for n in 0..MAX_GENERATION_ATTEMPTS {
        let identifier = probe.next_identifier();
        insert_taxi_with_identifier(&ctx.db, user.id, &identifier, &format!("CCC000{}", n)).await;
    }

    let err = vehicle_repository::create_taxi(&ctx.db, &seeded_generator(7), &taxi_dto(user.id, "DDD3333"))
        .await
        .unwrap_err();

    assert!(matches!(err, VehicleError::IdentifierExhausted { attempts: 5 }));
}

#[tokio::test]
async fn vehicle_lookup_probes_every_kind() {
    let ctx = test_context().await;
    let user = create_driver(&ctx.db, "driver1").await;

    let moto = vehicle_repository::create_mototaxi(&ctx.db, &seeded_generator(2), &taxi_dto(user.id, "MMM1111"))
        .await
        .unwrap();

    let transport_dto = CreateMunicipalTransportDto {
        vehicle: taxi_dto(user.id, "TTT2222"),
        line: String::from("Linha 101 - Centro"),
        capacity: 32,
    };
    let transport =
        vehicle_repository::create_municipal_transport(&ctx.db, &seeded_generator(3), &transport_dto)
            .await
            .unwrap();

    let found = registry::find_vehicle_by_identifier(&ctx.db, &moto.identifier)
        .await
        .unwrap();
    assert!(matches!(found, Some(VehicleRef::Mototaxi(ref v)) if v.id == moto.id));

    let found = registry::find_vehicle_by_identifier(&ctx.db, &transport.identifier)
        .await
        .unwrap();
    assert!(matches!(found, Some(VehicleRef::MunicipalTransport(ref v)) if v.id == transport.id));

    let found = registry::find_vehicle_by_identifier(&ctx.db, "ZZZZZZZZ").await.unwrap();
    assert!(found.is_none());

    // banners of non taxi vehicles land under their own kind directory
    let banner = ctx.service.create_for_identifier(&transport.identifier).await.unwrap();
    assert!(banner
        .file_path
        .unwrap()
        .starts_with("banners_identificacao/veiculo/transporte_municipal/"));
}

#[tokio::test]
async fn a_vehicle_cannot_hold_two_active_banners() {
    let ctx = test_context().await;

    let user = create_driver(&ctx.db, "driver1").await;
    let taxi = vehicle_repository::create_taxi(&ctx.db, &seeded_generator(1), &taxi_dto(user.id, "ABC1234"))
        .await
        .unwrap();

    let banner = ctx.service.create_for_identifier(&taxi.identifier).await.unwrap();

    let err = ctx.service.create_for_identifier(&taxi.identifier).await.unwrap_err();

    match err {
        BannerError::AlreadyActive { banner_id, .. } => assert_eq!(banner_id, banner.id),
        other => panic!("expected AlreadyActive, got {:?}", other),
    }
}

#[tokio::test]
async fn inactive_banners_are_reactivated_instead_of_duplicated() {
    let ctx = test_context().await;

    let user = create_driver(&ctx.db, "driver1").await;
    let taxi = vehicle_repository::create_taxi(&ctx.db, &seeded_generator(1), &taxi_dto(user.id, "ABC1234"))
        .await
        .unwrap();

    let banner = ctx.service.create_for_identifier(&taxi.identifier).await.unwrap();

    let deactivated = banner_repository::deactivate_releasing_pair(&ctx.db, banner.clone())
        .await
        .unwrap();
    assert!(!deactivated.active);
    assert_eq!(deactivated.vehicle_id, None);

    let reactivated = ctx.service.create_for_identifier(&taxi.identifier).await.unwrap();

    assert_eq!(reactivated.id, banner.id);
    assert!(reactivated.active);
    assert_eq!(reactivated.vehicle_id, Some(taxi.id));
}

#[tokio::test]
async fn stale_banners_holding_a_recycled_id_are_displaced() {
    let ctx = test_context().await;

    let user = create_driver(&ctx.db, "driver1").await;
    let taxi = vehicle_repository::create_taxi(&ctx.db, &seeded_generator(1), &taxi_dto(user.id, "ABC1234"))
        .await
        .unwrap();

    // a banner of a deleted vehicle still referencing the recycled numeric id
    let stale = insert_banner_row(&ctx.db, "taxi", Some(taxi.id), Some("GONEGONE")).await;

    let banner = ctx.service.create_for_identifier(&taxi.identifier).await.unwrap();

    assert_ne!(banner.id, stale.id);
    assert_eq!(banner.vehicle_id, Some(taxi.id));
    assert_eq!(banner.vehicle_identifier.as_deref(), Some(taxi.identifier.as_str()));

    let stale = banner_repository::find_by_id(&ctx.db, stale.id).await.unwrap().unwrap();
    assert!(!stale.active);
    assert_eq!(stale.vehicle_id, None);
    assert_eq!(stale.vehicle_identifier.as_deref(), Some("GONEGONE"));
}

#[tokio::test]
async fn missing_reference_halves_are_backfilled_on_generation() {
    let ctx = test_context().await;

    let user = create_driver(&ctx.db, "driver1").await;
    let taxi = vehicle_repository::create_taxi(&ctx.db, &seeded_generator(1), &taxi_dto(user.id, "ABC1234"))
        .await
        .unwrap();

    // legacy row that only carries the identifier half
    let banner = insert_banner_row(&ctx.db, "taxi", None, Some(&taxi.identifier)).await;
    let updated = ctx.service.generate(banner.id).await.unwrap();
    assert_eq!(updated.vehicle_id, Some(taxi.id));

    // legacy row that only carries the numeric pair
    let moto = vehicle_repository::create_mototaxi(&ctx.db, &seeded_generator(2), &taxi_dto(user.id, "EEE4444"))
        .await
        .unwrap();
    let banner = insert_banner_row(&ctx.db, "mototaxi", Some(moto.id), None).await;
    let updated = ctx.service.generate(banner.id).await.unwrap();
    assert_eq!(updated.vehicle_identifier.as_deref(), Some(moto.identifier.as_str()));
}

#[tokio::test]
async fn the_identifier_half_wins_over_a_stale_numeric_pair() {
    let ctx = test_context().await;

    let user = create_driver(&ctx.db, "driver1").await;
    let taxi = vehicle_repository::create_taxi(&ctx.db, &seeded_generator(1), &taxi_dto(user.id, "ABC1234"))
        .await
        .unwrap();

    // the numeric half points at a row that no longer exists
    let banner = insert_banner_row(&ctx.db, "taxi", Some(taxi.id + 1000), Some(&taxi.identifier)).await;

    let updated = ctx.service.generate(banner.id).await.unwrap();

    assert_eq!(updated.vehicle_id, Some(taxi.id));
    assert_eq!(updated.vehicle_identifier.as_deref(), Some(taxi.identifier.as_str()));
}

#[tokio::test]
async fn generating_an_unresolvable_banner_fails() {
    let ctx = test_context().await;

    let banner = insert_banner_row(&ctx.db, "taxi", Some(424242), Some("GONEGONE")).await;

    let err = ctx.service.generate(banner.id).await.unwrap_err();
    assert!(matches!(err, BannerError::VehicleNotFound(_)));

    let err = ctx.service.generate(999_999).await.unwrap_err();
    assert!(matches!(err, BannerError::NotFound(999_999)));
}

#[tokio::test]
async fn regenerating_moves_the_artifact_when_the_plate_changes() {
    let ctx = test_context().await;

    let user = create_driver(&ctx.db, "driver1").await;
    let taxi = vehicle_repository::create_taxi(&ctx.db, &seeded_generator(1), &taxi_dto(user.id, "ABC1234"))
        .await
        .unwrap();

    let banner = ctx.service.create_for_identifier(&taxi.identifier).await.unwrap();
    let old_key = String::from(banner_artifact_key("taxi", &taxi.identifier, "ABC1234"));
    assert!(ctx.artifact_path(&old_key).exists());

    let mut active = taxi.clone().into_active_model();
    active.plate = Set(String::from("XYZ9876"));
    active.update(&ctx.db).await.unwrap();

    let updated = ctx.service.regenerate(banner.id).await.unwrap();

    let new_key = String::from(banner_artifact_key("taxi", &taxi.identifier, "XYZ9876"));
    assert_eq!(updated.file_path.as_deref(), Some(new_key.as_str()));

    assert!(ctx.artifact_path(&new_key).exists());
    assert!(!ctx.artifact_path(&old_key).exists());
}

#[tokio::test]
async fn deleting_a_banner_removes_the_row_and_its_file() {
    let ctx = test_context().await;

    let user = create_driver(&ctx.db, "driver1").await;
    let taxi = vehicle_repository::create_taxi(&ctx.db, &seeded_generator(1), &taxi_dto(user.id, "ABC1234"))
        .await
        .unwrap();

    let banner = ctx.service.create_for_identifier(&taxi.identifier).await.unwrap();
    let key = banner.file_path.clone().unwrap();
    let file = ctx.artifact_path(&key);
    assert!(file.exists());

    ctx.service.delete(banner.id).await.unwrap();

    assert!(banner_repository::find_by_id(&ctx.db, banner.id).await.unwrap().is_none());
    assert!(!file.exists());

    // the now empty identifier directory is pruned, but only that one level
    let identifier_dir = file.parent().unwrap();
    assert!(!identifier_dir.exists());
    assert!(identifier_dir.parent().unwrap().exists());
}

#[tokio::test]
async fn delete_many_skips_rows_that_no_longer_exist() {
    let ctx = test_context().await;

    let user = create_driver(&ctx.db, "driver1").await;
    let taxi_a = vehicle_repository::create_taxi(&ctx.db, &seeded_generator(1), &taxi_dto(user.id, "AAA1111"))
        .await
        .unwrap();
    let taxi_b = vehicle_repository::create_taxi(&ctx.db, &seeded_generator(2), &taxi_dto(user.id, "BBB2222"))
        .await
        .unwrap();

    let banner_a = ctx.service.create_for_identifier(&taxi_a.identifier).await.unwrap();
    let banner_b = ctx.service.create_for_identifier(&taxi_b.identifier).await.unwrap();

    // a banner whose file is already gone must still delete cleanly
    std::fs::remove_file(ctx.artifact_path(banner_b.file_path.as_deref().unwrap())).unwrap();

    let deleted = ctx
        .service
        .delete_many(&[banner_a.id, 999_999, banner_b.id])
        .await
        .unwrap();

    assert_eq!(deleted, 2);
    assert!(banner_repository::find_by_id(&ctx.db, banner_a.id).await.unwrap().is_none());
    assert!(banner_repository::find_by_id(&ctx.db, banner_b.id).await.unwrap().is_none());
}

#[tokio::test]
async fn registration_codes_count_up_within_their_prefix() {
    let ctx = test_context().await;

    let prefix = format!("{}-TAX-", Utc::now().date_naive().format("%Y%m%d"));

    for (username, expected) in [("driver1", "001"), ("driver2", "002"), ("driver3", "003")] {
        let user = create_driver(&ctx.db, username).await;

        assert_eq!(
            user.registration_code.as_deref(),
            Some(format!("{}{}", prefix, expected).as_str())
        );
    }

    let admin = create_user(
        &ctx.db,
        &CreateUserDto {
            username: String::from("admin"),
            email: String::from("admin@example.com"),
            cpf: None,
            is_superuser: true,
            groups: vec![],
        },
    )
    .await
    .unwrap();

    let admin_prefix = format!("{}ADM", Utc::now().date_naive().format("%Y"));
    assert_eq!(
        admin.registration_code.as_deref(),
        Some(format!("{}001", admin_prefix).as_str())
    );
}
