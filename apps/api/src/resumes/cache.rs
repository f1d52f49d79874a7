//! Read-through Redis cache of `ResumeAnalysis`.
//!
//! PostgreSQL stays the source of truth. Entries expire after a TTL, texts
//! above `MAX_CACHED_TEXT_BYTES` are never cached, and deletes invalidate
//! explicitly. Every cache failure is logged and treated as a miss.

use redis::{AsyncCommands, RedisResult};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::resume::ResumeAnalysis;

const KEY_PREFIX: &str = "compass:resume";
pub const MAX_CACHED_TEXT_BYTES: usize = 64 * 1024;

#[derive(Clone)]
pub struct ResumeCache {
    client: redis::Client,
    ttl_secs: u64,
}

impl ResumeCache {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }

    pub async fn get(&self, resume_id: Uuid) -> Option<ResumeAnalysis> {
        match self.fetch(resume_id).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(analysis) => {
                    debug!("Resume cache hit for {resume_id}");
                    Some(analysis)
                }
                Err(e) => {
                    warn!("Discarding undecodable cache entry for {resume_id}: {e}");
                    self.invalidate(resume_id).await;
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Resume cache read failed for {resume_id}: {e}");
                None
            }
        }
    }

    pub async fn put(&self, resume_id: Uuid, analysis: &ResumeAnalysis) {
        if !is_cacheable(analysis) || self.ttl_secs == 0 {
            return;
        }
        let payload = match serde_json::to_string(analysis) {
            Ok(p) => p,
            Err(e) => {
                warn!("Could not encode resume {resume_id} for cache: {e}");
                return;
            }
        };

        if let Err(e) = self.store(resume_id, payload).await {
            warn!("Resume cache write failed for {resume_id}: {e}");
        }
    }

    pub async fn invalidate(&self, resume_id: Uuid) {
        if let Err(e) = self.remove(resume_id).await {
            warn!("Resume cache invalidation failed for {resume_id}: {e}");
        }
    }

    async fn fetch(&self, resume_id: Uuid) -> RedisResult<Option<String>> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        con.get(cache_key(resume_id)).await
    }

    async fn store(&self, resume_id: Uuid, payload: String) -> RedisResult<()> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        con.set_ex(cache_key(resume_id), payload, self.ttl_secs).await
    }

    async fn remove(&self, resume_id: Uuid) -> RedisResult<()> {
        let mut con = self.client.get_multiplexed_async_connection().await?;
        con.del(cache_key(resume_id)).await
    }
}

fn cache_key(resume_id: Uuid) -> String {
    format!("{KEY_PREFIX}:{resume_id}")
}

fn is_cacheable(analysis: &ResumeAnalysis) -> bool {
    analysis.text.len() <= MAX_CACHED_TEXT_BYTES
}
