use crate::cli::{Cli, Commands};
use crate::config::app_config;
use crate::modules::banner::error::BannerError;
use crate::modules::banner::repository as banner_repository;
use crate::modules::banner::service::BannerService;
use crate::modules::user::repository::{create_user, CreateUserDto};
use crate::modules::vehicle::dto::{CreateMunicipalTransportDto, CreateVehicleDto};
use crate::modules::vehicle::identifier::IdentifierGenerator;
use crate::modules::vehicle::registry;
use crate::modules::vehicle::repository as vehicle_repository;
use crate::services::urls::UrlBuilder;
use entity::vehicle_kind::VehicleKind;
use fake::{faker, Fake};
use rand::{seq::SliceRandom, Rng};
use sea_orm::DatabaseConnection;
use strum::IntoEnumIterator;

pub async fn execute(cli: Cli, db: &DatabaseConnection) -> anyhow::Result<()> {
    match cli.command {
        Commands::FixQrUrls {
            dry_run,
            regenerate_files,
        } => fix_qr_urls(db, dry_run, regenerate_files).await,

        Commands::RegenerateBanners { dry_run } => regenerate_banners(db, dry_run).await,

        Commands::Inspect {
            identifier,
            regenerate,
        } => inspect(db, identifier.as_deref(), regenerate).await,

        Commands::Seed {
            users,
            vehicles,
            banners,
        } => seed(db, users, vehicles, banners).await,
    }
}

/// Walks every banner and rewrites QR URLs that no longer match the vehicle
/// info page of the referenced vehicle, eg: after the API base URL changed.
///
/// Banners whose vehicle cannot be resolved anymore are deactivated instead.
async fn fix_qr_urls(
    db: &DatabaseConnection,
    dry_run: bool,
    regenerate_files: bool,
) -> anyhow::Result<()> {
    let urls = UrlBuilder::new(app_config().site_url.clone());
    let service = BannerService::from_config(db.clone());

    let banners = banner_repository::find_all(db).await?;
    println!("checking {} banners", banners.len());

    let mut corrected = 0;
    let mut errors = 0;

    for banner in banners {
        let banner_id = banner.id;

        let Some(vehicle) = banner_repository::resolve_vehicle(db, &banner).await? else {
            println!("banner {}: vehicle reference does not resolve", banner_id);
            errors += 1;

            if !dry_run && banner.active {
                banner_repository::deactivate_releasing_pair(db, banner).await?;
                println!("banner {}: deactivated", banner_id);
            }

            continue;
        };

        let expected = urls.vehicle_info_url(vehicle.identifier());

        if banner.qr_url.as_deref() == Some(expected.as_str()) {
            continue;
        }

        println!("banner {}: QR URL out of date", banner_id);
        println!("  stored:  {}", banner.qr_url.as_deref().unwrap_or("<none>"));
        println!("  correct: {}", expected);

        if dry_run {
            corrected += 1;
            continue;
        }

        let fix_result = if regenerate_files {
            service.regenerate(banner_id).await.map(|_| ())
        } else {
            banner_repository::update_qr_url(db, banner, &expected)
                .await
                .map(|_| ())
                .map_err(BannerError::from)
        };

        match fix_result {
            Ok(()) => corrected += 1,
            Err(err) => {
                println!("banner {}: fix failed: {}", banner_id, err);
                errors += 1;
            }
        }
    }

    if dry_run {
        println!("dry run: {} banners would be corrected, {} errors", corrected, errors);
    } else {
        println!("done: {} banners corrected, {} errors", corrected, errors);
    }

    Ok(())
}

/// Re-renders every banner artifact from current vehicle data, continuing
/// past individual failures so one broken row does not abort the batch.
async fn regenerate_banners(db: &DatabaseConnection, dry_run: bool) -> anyhow::Result<()> {
    let service = BannerService::from_config(db.clone());

    let banners = banner_repository::find_all(db).await?;
    println!("regenerating {} banners", banners.len());

    let mut regenerated = 0;
    let mut errors = 0;

    for banner in banners {
        let banner_id = banner.id;

        if dry_run {
            match banner_repository::resolve_vehicle(db, &banner).await? {
                Some(vehicle) => {
                    println!(
                        "banner {}: would regenerate for vehicle {}",
                        banner_id,
                        vehicle.identifier()
                    );
                    regenerated += 1;
                }
                None => {
                    println!("banner {}: vehicle reference does not resolve", banner_id);
                    errors += 1;
                }
            }

            continue;
        }

        match service.regenerate(banner_id).await {
            Ok(updated) => {
                println!(
                    "banner {}: {}",
                    banner_id,
                    updated.file_path.as_deref().unwrap_or("<no file>")
                );
                regenerated += 1;
            }
            Err(err) => {
                println!("banner {}: {}", banner_id, err);
                errors += 1;
            }
        }
    }

    if dry_run {
        println!("dry run: {} would be regenerated, {} errors", regenerated, errors);
    } else {
        println!("done: {} regenerated, {} errors", regenerated, errors);
    }

    Ok(())
}

/// How many vehicles of each kind a full inspection pass walks.
const INSPECT_SAMPLE_PER_KIND: u64 = 5;

/// Walks vehicles and reports the state of their banners, optionally
/// creating or regenerating them, eg: to smoke test the banner pipeline
/// against a freshly seeded database.
async fn inspect(
    db: &DatabaseConnection,
    identifier: Option<&str>,
    regenerate: bool,
) -> anyhow::Result<()> {
    let urls = UrlBuilder::new(app_config().site_url.clone());

    let vehicles = match identifier {
        Some(identifier) => match registry::find_vehicle_by_identifier(db, identifier).await? {
            Some(vehicle) => vec![vehicle],
            None => {
                println!("no vehicle found for {}", identifier);
                return Ok(());
            }
        },
        None => registry::sample_vehicles(db, INSPECT_SAMPLE_PER_KIND).await?,
    };

    if vehicles.is_empty() {
        println!("no vehicles found");
        return Ok(());
    }

    let service = BannerService::from_config(db.clone());

    for vehicle in vehicles {
        println!(
            "{} {} plate={}",
            vehicle.kind(),
            vehicle.identifier(),
            vehicle.plate()
        );

        let banner =
            banner_repository::find_by_vehicle(db, vehicle.kind(), vehicle.identifier()).await?;

        match &banner {
            Some(banner) => {
                let state = if banner.active { "active" } else { "inactive" };

                println!("  banner {} [{}]", banner.id, state);
                println!("  file: {}", banner.file_path.as_deref().unwrap_or("<none>"));
                if let Some(file_path) = banner.file_path.as_deref() {
                    println!("  url:  {}", urls.media_url(file_path));
                }
                println!("  qr:   {}", banner.qr_url.as_deref().unwrap_or("<none>"));
            }
            None => println!("  banner: <none>"),
        }

        if regenerate {
            let result = match banner {
                Some(banner) if banner.active => service.regenerate(banner.id).await,
                _ => service.create_for_identifier(vehicle.identifier()).await,
            };

            match result {
                Ok(updated) => println!(
                    "  regenerated: {}",
                    updated.file_path.as_deref().unwrap_or("<no file>")
                ),
                Err(err) => println!("  failed: {}", err),
            }
        }
    }

    Ok(())
}

const ALPHA: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const NUMERIC: &str = "0123456789";

const COLORS: [&str; 8] = [
    "Branco", "Prata", "Preto", "Cinza", "Vermelho", "Azul", "Verde", "Amarelo",
];

const BRANDS: [&str; 8] = [
    "Fiat", "Volkswagen", "Chevrolet", "Toyota", "Hyundai", "Honda", "Renault", "Ford",
];

const MODELS: [&str; 8] = [
    "Uno", "Gol", "Onix", "Corolla", "HB20", "Civic", "Sandero", "Ka",
];

const TRANSPORT_LINES: [&str; 4] = [
    "Linha 101 - Centro",
    "Linha 204 - Terminal",
    "Linha 310 - Industrial",
    "Linha 415 - Rural",
];

const DRIVER_GROUPS: [&str; 3] = ["TAXISTA", "MOTOTAXISTA", "MOTORISTA CONDUTOR"];

/// Creates a brazilian vehicle plate in the `AAA9999` format, where:
///
/// - A = uppercase alphabetic characters
/// - 9 = numbers 0 to 9
fn fake_br_vehicle_plate() -> String {
    let a: String = fake::StringFaker::with(Vec::from(ALPHA), 3).fake();
    let b: String = fake::StringFaker::with(Vec::from(NUMERIC), 4).fake();

    a + b.as_str()
}

fn fake_renavam() -> String {
    fake::StringFaker::with(Vec::from(NUMERIC), 11).fake()
}

fn fake_chassis_number() -> String {
    let pool = format!("{}{}", ALPHA, NUMERIC).into_bytes();

    fake::StringFaker::with(pool, 17).fake()
}

fn fake_cpf() -> String {
    let digits: String = fake::StringFaker::with(Vec::from(NUMERIC), 11).fake();

    format!(
        "{}.{}.{}-{}",
        &digits[..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..]
    )
}

/// Populates the database with fake drivers and their vehicles, we dont care
/// if brands and models dont match, seeded data can be silly.
async fn seed(
    db: &DatabaseConnection,
    users: usize,
    vehicles_per_user: usize,
    banners: bool,
) -> anyhow::Result<()> {
    let generator = IdentifierGenerator::from_entropy();

    let kinds: Vec<VehicleKind> = VehicleKind::iter().collect();

    let mut created_vehicles: Vec<String> = Vec::new();

    for _ in 0..users {
        let group = DRIVER_GROUPS
            .choose(&mut rand::thread_rng())
            .unwrap()
            .to_string();

        let user = create_user(
            db,
            &CreateUserDto {
                username: faker::internet::en::Username().fake::<String>(),
                email: faker::internet::en::SafeEmail().fake::<String>(),
                cpf: Some(fake_cpf()),
                is_superuser: false,
                groups: vec![group],
            },
        )
        .await?;

        for _ in 0..vehicles_per_user {
            let fabrication_year = rand::thread_rng().gen_range(2005..2024);

            let vehicle = CreateVehicleDto {
                plate: fake_br_vehicle_plate(),
                renavam: fake_renavam(),
                chassis_number: fake_chassis_number(),
                brand: BRANDS.choose(&mut rand::thread_rng()).unwrap().to_string(),
                model: MODELS.choose(&mut rand::thread_rng()).unwrap().to_string(),
                color: COLORS.choose(&mut rand::thread_rng()).unwrap().to_string(),
                fabrication_year,
                fabrication_year_limit: fabrication_year + 10,
                user_id: user.id,
            };

            let identifier = match kinds.choose(&mut rand::thread_rng()).unwrap() {
                VehicleKind::Taxi => {
                    vehicle_repository::create_taxi(db, &generator, &vehicle)
                        .await?
                        .identifier
                }
                VehicleKind::Mototaxi => {
                    vehicle_repository::create_mototaxi(db, &generator, &vehicle)
                        .await?
                        .identifier
                }
                VehicleKind::MunicipalTransport => {
                    let transport = CreateMunicipalTransportDto {
                        vehicle,
                        line: TRANSPORT_LINES
                            .choose(&mut rand::thread_rng())
                            .unwrap()
                            .to_string(),
                        capacity: rand::thread_rng().gen_range(12..45),
                    };

                    vehicle_repository::create_municipal_transport(db, &generator, &transport)
                        .await?
                        .identifier
                }
            };

            created_vehicles.push(identifier);
        }
    }

    println!(
        "created {} users and {} vehicles",
        users,
        created_vehicles.len()
    );

    if banners {
        let service = BannerService::from_config(db.clone());

        for identifier in &created_vehicles {
            service.create_for_identifier(identifier).await?;
        }

        println!("created {} banners", created_vehicles.len());
    }

    Ok(())
}
