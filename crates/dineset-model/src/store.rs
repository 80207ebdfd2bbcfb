//! CSV table adapter.
//!
//! The stage builders are pure in-memory transforms; this module is the
//! only place that touches the filesystem. Tables are written with a
//! header row and no index column, and read back through the same serde
//! derives, so a file round-trip is lossless.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::entities::{Stage1Output, Stage2Output, Stage3Output};
use crate::error::DatasetError;

// Table file names, shared between writer and precondition checks.
pub const CITIES: &str = "cities.csv";
pub const CHANNELS: &str = "acquisition_channels.csv";
pub const USERS: &str = "users.csv";
pub const REFERRALS: &str = "referrals.csv";
pub const RESTAURANTS: &str = "restaurants.csv";
pub const MENU: &str = "menu.csv";
pub const ORDERS: &str = "orders.csv";
pub const ORDER_ITEMS: &str = "order_items.csv";
pub const DELIVERY_TRACKING: &str = "delivery_tracking.csv";
pub const REVIEWS: &str = "reviews.csv";
pub const USER_SESSIONS: &str = "user_sessions.csv";
pub const CART_ITEMS: &str = "cart_items.csv";

/// Tables Stage 2 reads from disk.
pub const STAGE2_INPUTS: &[&str] = &[USERS, RESTAURANTS, MENU];
/// Tables Stage 3 reads from disk.
pub const STAGE3_INPUTS: &[&str] = &[USERS, RESTAURANTS, MENU, ORDERS, ORDER_ITEMS];

/// A directory of CSV tables.
#[derive(Debug, Clone)]
pub struct TableStore {
    dir: PathBuf,
}

impl TableStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, table: &str) -> PathBuf {
        self.dir.join(table)
    }

    /// Fatal precondition check: every named table must already exist.
    /// Called before any generation so a half-run never produces output.
    pub fn require_inputs(&self, tables: &[&str]) -> Result<(), DatasetError> {
        for table in tables {
            let path = self.path_of(table);
            if !path.exists() {
                return Err(DatasetError::MissingInput { path });
            }
        }
        Ok(())
    }

    pub fn write_table<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<(), DatasetError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_of(table);
        let mut writer = csv::Writer::from_path(&path).map_err(|source| {
            DatasetError::WriteTable {
                path: path.clone(),
                source,
            }
        })?;
        for row in rows {
            writer
                .serialize(row)
                .map_err(|source| DatasetError::WriteTable {
                    path: path.clone(),
                    source,
                })?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn read_table<T: DeserializeOwned>(&self, table: &str) -> Result<Vec<T>, DatasetError> {
        let path = self.path_of(table);
        if !path.exists() {
            return Err(DatasetError::MissingInput { path });
        }
        let mut reader =
            csv::Reader::from_path(&path).map_err(|source| DatasetError::ReadTable {
                path: path.clone(),
                source,
            })?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row.map_err(|source| DatasetError::ReadTable {
                path: path.clone(),
                source,
            })?);
        }
        Ok(rows)
    }

    pub fn write_stage1(&self, out: &Stage1Output) -> Result<(), DatasetError> {
        self.write_table(CITIES, &out.cities)?;
        self.write_table(CHANNELS, &out.channels)?;
        self.write_table(USERS, &out.users)?;
        self.write_table(REFERRALS, &out.referrals)?;
        self.write_table(RESTAURANTS, &out.restaurants)?;
        self.write_table(MENU, &out.menu)?;
        Ok(())
    }

    pub fn write_stage2(&self, out: &Stage2Output) -> Result<(), DatasetError> {
        self.write_table(ORDERS, &out.orders)?;
        self.write_table(ORDER_ITEMS, &out.order_items)?;
        self.write_table(DELIVERY_TRACKING, &out.delivery_tracking)?;
        self.write_table(REVIEWS, &out.reviews)?;
        Ok(())
    }

    pub fn write_stage3(&self, out: &Stage3Output) -> Result<(), DatasetError> {
        self.write_table(USER_SESSIONS, &out.sessions)?;
        self.write_table(CART_ITEMS, &out.cart_items)?;
        Ok(())
    }
}
