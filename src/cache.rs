//! In-memory caching using moka
//!
//! Caches the deal catalog and per-pilgrimage attraction lists. Both change
//! rarely compared to how often trips are priced and planned.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::planner::models::{Attraction, Deal};
use crate::planner::queries;

const ACTIVE_DEALS_KEY: &str = "deals:active";

/// Application cache holding catalog data
#[derive(Clone)]
pub struct AppCache {
    /// Active deals by code
    pub deals_by_code: Cache<String, Arc<Deal>>,
    /// Full active deal catalog (single entry)
    pub active_deals: Cache<String, Arc<Vec<Deal>>>,
    /// Attractions (pilgrimage_id -> catalog)
    pub attractions: Cache<i32, Arc<Vec<Attraction>>>,
}

impl AppCache {
    /// Create a new cache instance; `ttl` bounds how stale catalog data may get
    pub fn new(ttl: Duration) -> Self {
        Self {
            // Deal codes: a few hundred at most
            deals_by_code: Cache::builder()
                .max_capacity(500)
                .time_to_live(ttl)
                .build(),

            active_deals: Cache::builder()
                .max_capacity(1)
                .time_to_live(ttl)
                .build(),

            // Attraction lists: one per pilgrimage, idle ones dropped early
            attractions: Cache::builder()
                .max_capacity(200)
                .time_to_live(ttl)
                .time_to_idle(ttl / 2)
                .build(),
        }
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            deals_by_code_size: self.deals_by_code.entry_count(),
            attraction_lists_size: self.attractions.entry_count(),
            active_deals_cached: self.active_deals.entry_count() > 0,
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.deals_by_code.invalidate_all();
        self.active_deals.invalidate_all();
        self.attractions.invalidate_all();
        info!("All caches invalidated");
    }

    pub async fn active_deals(&self) -> Option<Arc<Vec<Deal>>> {
        self.active_deals.get(ACTIVE_DEALS_KEY).await
    }

    /// Store the active catalog and index it by code
    pub async fn store_active_deals(&self, deals: Vec<Deal>) -> Arc<Vec<Deal>> {
        for deal in &deals {
            self.deals_by_code
                .insert(deal.code.clone(), Arc::new(deal.clone()))
                .await;
        }
        let deals = Arc::new(deals);
        self.active_deals
            .insert(ACTIVE_DEALS_KEY.to_string(), deals.clone())
            .await;
        deals
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(10 * 60))
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub deals_by_code_size: u64,
    pub attraction_lists_size: u64,
    pub active_deals_cached: bool,
}

/// Start background cache warmer
///
/// Warms the deal catalog on startup and refreshes it every `period`.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool, period: Duration) {
    let mut interval = interval(period);
    loop {
        // First tick completes immediately
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Warm the cache with the active deal catalog
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    match queries::get_active_deals(db).await {
        Ok(deals) => {
            cache.store_active_deals(deals).await;
        }
        Err(e) => warn!("Failed to warm deal cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn deal(code: &str) -> Deal {
        Deal {
            id: 1,
            code: code.to_string(),
            title: String::new(),
            discount_percentage: dec!(15),
            valid_from: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
            valid_to: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
            pilgrimage_id: None,
            min_travelers: 1,
            min_days: 1,
            active: true,
        }
    }

    #[tokio::test]
    async fn test_store_active_deals_indexes_codes() {
        let cache = AppCache::default();
        cache
            .store_active_deals(vec![deal("EARLYBIRD"), deal("GROUP20")])
            .await;

        let all = cache.active_deals().await.unwrap();
        assert_eq!(all.len(), 2);
        let group = cache.deals_by_code.get("GROUP20").await.unwrap();
        assert_eq!(group.code, "GROUP20");
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let cache = AppCache::default();
        cache.store_active_deals(vec![deal("EARLYBIRD")]).await;
        cache.invalidate_all();

        assert!(cache.active_deals().await.is_none());
        assert!(cache.deals_by_code.get("EARLYBIRD").await.is_none());
    }
}
