//! CLI definition using clap

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "transito")]
#[command(version)]
#[command(about = "Municipal transit registry maintenance tools")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Recheck the QR URL stored on every banner, fixing rows that drifted
    FixQrUrls {
        /// Report what would change without writing anything
        #[arg(long)]
        dry_run: bool,

        /// Also re-render the banner file of every corrected row
        #[arg(long)]
        regenerate_files: bool,
    },

    /// Re-render the artifact of every banner from current vehicle data
    RegenerateBanners {
        /// Report what would be regenerated without writing anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Walk vehicles and report the state of their banners
    Inspect {
        /// Restrict the walk to the vehicle with this identifier
        identifier: Option<String>,

        /// Regenerate the listed banners after inspecting them
        #[arg(long)]
        regenerate: bool,
    },

    /// Populate the database with fake users, vehicles and banners
    Seed {
        /// How many users to create
        #[arg(long, default_value = "10")]
        users: usize,

        /// How many vehicles to create per user
        #[arg(long, default_value = "3")]
        vehicles: usize,

        /// Also create and render a banner for every seeded vehicle
        #[arg(long)]
        banners: bool,
    },
}
