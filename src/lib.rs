pub mod api;
pub mod booking;
pub mod config;
pub mod db;

pub use db::DbPool;

use config::Config;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Per-(resource id, date) locks serializing the conflict check and insert
/// for a booking bucket. Requests for different buckets never contend.
pub type BookingLocks = DashMap<(String, String), Arc<Mutex<()>>>;

pub struct AppState {
    pub config: Config,
    pub db: DbPool,
    pub booking_locks: BookingLocks,
}

impl AppState {
    pub fn new(config: Config, db: DbPool) -> Self {
        Self {
            config,
            db,
            booking_locks: DashMap::new(),
        }
    }

    /// Lock guarding check-then-insert for one resource on one date.
    pub fn booking_lock(&self, resource_id: &str, date: &str) -> Arc<Mutex<()>> {
        self.booking_locks
            .entry((resource_id.to_string(), date.to_string()))
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
