//! Dineset CLI
//!
//! Command-line driver for the three-stage dataset generator:
//! - `stage1` — foundation tables (cities, channels, users, referrals,
//!   restaurants, menu)
//! - `stage2` — transactions (orders, order items, delivery tracking,
//!   reviews)
//! - `stage3` — engagement (sessions, cart items)
//! - `all` — the whole pipeline in one process, one table directory
//!
//! Stages 2 and 3 read their inputs back from the table directory, so
//! they can be re-run (with a different seed, say) on top of an existing
//! foundation. `all` skips the intermediate file round-trip and passes
//! rows in memory; both paths produce identical files for the same seed.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;

use dineset_gen::{seeded_rng, stage1, stage2, stage3};
use dineset_model::{store, GeneratorConfig, TableStore};

#[derive(Parser)]
#[command(name = "dineset")]
#[command(
    author,
    version,
    about = "Dineset: seeded generator for a food-delivery SQL practice dataset"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the foundation tables (cities, channels, users, referrals,
    /// restaurants, menu).
    Stage1 {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Generate transactions (orders, order items, delivery tracking,
    /// reviews). Requires stage1 output in the table directory.
    Stage2 {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Generate engagement tables (sessions, cart items). Requires
    /// stage1 and stage2 output in the table directory.
    Stage3 {
        #[command(flatten)]
        common: CommonArgs,
    },

    /// Run all three stages in one process.
    All {
        #[command(flatten)]
        common: CommonArgs,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Directory the CSV tables are written to (and read back from).
    #[arg(short, long, default_value = "output")]
    out: PathBuf,

    /// RNG seed. Same seed, same flags: byte-identical tables.
    #[arg(long)]
    seed: Option<u64>,

    /// Number of users.
    #[arg(long)]
    users: Option<usize>,

    /// Number of restaurants.
    #[arg(long)]
    restaurants: Option<usize>,

    /// Number of cities (max 50).
    #[arg(long)]
    cities: Option<usize>,

    /// Order count the daily scheduler aims for.
    #[arg(long)]
    orders: Option<usize>,

    /// First simulated day (YYYY-MM-DD).
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Last simulated day (YYYY-MM-DD).
    #[arg(long)]
    end_date: Option<NaiveDate>,

    /// Small preset (10 users, 5 restaurants) for smoke runs; explicit
    /// flags still override.
    #[arg(long)]
    tiny: bool,
}

impl CommonArgs {
    fn config(&self) -> Result<GeneratorConfig> {
        let mut config = if self.tiny {
            GeneratorConfig::tiny()
        } else {
            GeneratorConfig::default()
        };
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(users) = self.users {
            config.num_users = users;
        }
        if let Some(restaurants) = self.restaurants {
            config.num_restaurants = restaurants;
        }
        if let Some(cities) = self.cities {
            config.num_cities = cities;
        }
        if let Some(orders) = self.orders {
            config.target_total_orders = orders;
        }
        if let Some(start) = self.start_date {
            config.start_date = start;
        }
        if let Some(end) = self.end_date {
            config.end_date = end;
        }
        if config.end_date <= config.start_date {
            anyhow::bail!(
                "end date {} must be after start date {}",
                config.end_date,
                config.start_date
            );
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Stage1 { common } => cmd_stage1(&common),
        Commands::Stage2 { common } => cmd_stage2(&common),
        Commands::Stage3 { common } => cmd_stage3(&common),
        Commands::All { common } => cmd_all(&common),
    }
}

fn cmd_stage1(common: &CommonArgs) -> Result<()> {
    let config = common.config()?;
    let store = TableStore::new(&common.out);
    println!(
        "{} stage 1 (seed {})",
        "Generating".green().bold(),
        config.seed
    );

    let mut rng = seeded_rng(config.seed);
    let out = stage1::generate(&config, &mut rng)?;
    store
        .write_stage1(&out)
        .context("writing stage 1 tables")?;

    println!(
        "  {} {} cities, {} channels, {} users, {} referrals",
        "→".cyan(),
        out.cities.len(),
        out.channels.len(),
        out.users.len(),
        out.referrals.len()
    );
    println!(
        "  {} {} restaurants, {} menu items",
        "→".cyan(),
        out.restaurants.len(),
        out.menu.len()
    );
    println!("  {} {}", "→".cyan(), store.dir().display());
    Ok(())
}

fn cmd_stage2(common: &CommonArgs) -> Result<()> {
    let config = common.config()?;
    let store = TableStore::new(&common.out);
    store
        .require_inputs(store::STAGE2_INPUTS)
        .context("stage 2 needs stage 1 output; run `dineset stage1` first")?;
    println!(
        "{} stage 2 (seed {})",
        "Generating".green().bold(),
        config.seed
    );

    let users = store.read_table(store::USERS)?;
    let restaurants = store.read_table(store::RESTAURANTS)?;
    let menu = store.read_table(store::MENU)?;

    let mut rng = seeded_rng(config.seed);
    let out = stage2::generate(&config, &users, &restaurants, &menu, &mut rng)?;
    store
        .write_stage2(&out)
        .context("writing stage 2 tables")?;

    println!(
        "  {} {} orders, {} order items",
        "→".cyan(),
        out.orders.len(),
        out.order_items.len()
    );
    println!(
        "  {} {} delivery records, {} reviews",
        "→".cyan(),
        out.delivery_tracking.len(),
        out.reviews.len()
    );
    println!("  {} {}", "→".cyan(), store.dir().display());
    Ok(())
}

fn cmd_stage3(common: &CommonArgs) -> Result<()> {
    let config = common.config()?;
    let store = TableStore::new(&common.out);
    store
        .require_inputs(store::STAGE3_INPUTS)
        .context("stage 3 needs stage 1 and 2 output; run earlier stages first")?;
    println!(
        "{} stage 3 (seed {})",
        "Generating".green().bold(),
        config.seed
    );

    let users = store.read_table(store::USERS)?;
    let restaurants = store.read_table(store::RESTAURANTS)?;
    let menu = store.read_table(store::MENU)?;
    let orders = store.read_table(store::ORDERS)?;
    let order_items = store.read_table(store::ORDER_ITEMS)?;

    let mut rng = seeded_rng(config.seed);
    let out = stage3::generate(
        &config,
        &users,
        &restaurants,
        &menu,
        &orders,
        &order_items,
        &mut rng,
    )?;
    store
        .write_stage3(&out)
        .context("writing stage 3 tables")?;

    println!(
        "  {} {} sessions, {} cart items",
        "→".cyan(),
        out.sessions.len(),
        out.cart_items.len()
    );
    println!("  {} {}", "→".cyan(), store.dir().display());
    Ok(())
}

/// Whole pipeline in memory. Each stage still starts from a fresh RNG
/// seeded the same way the standalone commands do, so `all` and a
/// stage1/stage2/stage3 sequence write identical files.
fn cmd_all(common: &CommonArgs) -> Result<()> {
    let config = common.config()?;
    let store = TableStore::new(&common.out);
    println!(
        "{} full pipeline (seed {})",
        "Generating".green().bold(),
        config.seed
    );

    let mut rng = seeded_rng(config.seed);
    let s1 = stage1::generate(&config, &mut rng)?;
    store.write_stage1(&s1).context("writing stage 1 tables")?;

    let mut rng = seeded_rng(config.seed);
    let s2 = stage2::generate(&config, &s1.users, &s1.restaurants, &s1.menu, &mut rng)?;
    store.write_stage2(&s2).context("writing stage 2 tables")?;

    let mut rng = seeded_rng(config.seed);
    let s3 = stage3::generate(
        &config,
        &s1.users,
        &s1.restaurants,
        &s1.menu,
        &s2.orders,
        &s2.order_items,
        &mut rng,
    )?;
    store.write_stage3(&s3).context("writing stage 3 tables")?;

    println!(
        "  {} {} users, {} restaurants, {} menu items",
        "→".cyan(),
        s1.users.len(),
        s1.restaurants.len(),
        s1.menu.len()
    );
    println!(
        "  {} {} orders, {} reviews, {} sessions, {} cart items",
        "→".cyan(),
        s2.orders.len(),
        s2.reviews.len(),
        s3.sessions.len(),
        s3.cart_items.len()
    );
    println!("  {} {}", "→".cyan(), store.dir().display());
    Ok(())
}
