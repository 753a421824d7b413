//! In-memory session store
//!
//! Each upload becomes its own session holding the parsed export. Requests
//! name the session they analyze, so a new upload never changes the matrix
//! another client is characterizing. Stored sessions are immutable.

use chrono::{DateTime, Utc};
use rfsc_common::SpectrumFile;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

/// One ingested export
#[derive(Debug)]
pub struct SpectrumSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Client-supplied file name, if any
    pub source_name: Option<String>,
    pub file: SpectrumFile,
    /// Insertion order, used for eviction
    seq: u64,
}

#[derive(Debug, Default)]
struct Sessions {
    by_id: HashMap<Uuid, Arc<SpectrumSession>>,
    next_seq: u64,
}

/// Bounded map of live sessions, oldest evicted first
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<Sessions>>,
    capacity: usize,
}

impl SessionStore {
    /// Create store holding at most `capacity` sessions (minimum 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Sessions::default())),
            capacity: capacity.max(1),
        }
    }

    /// Store a parsed export under a fresh id
    pub async fn insert(
        &self,
        file: SpectrumFile,
        source_name: Option<String>,
    ) -> Arc<SpectrumSession> {
        let mut sessions = self.inner.write().await;

        while sessions.by_id.len() >= self.capacity {
            let oldest = sessions
                .by_id
                .values()
                .min_by_key(|s| s.seq)
                .map(|s| s.id);
            match oldest {
                Some(id) => {
                    sessions.by_id.remove(&id);
                    info!(session_id = %id, "Evicted oldest session");
                }
                None => break,
            }
        }

        let seq = sessions.next_seq;
        sessions.next_seq += 1;

        let session = Arc::new(SpectrumSession {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            source_name,
            file,
            seq,
        });
        sessions.by_id.insert(session.id, Arc::clone(&session));
        session
    }

    pub async fn get(&self, id: Uuid) -> Option<Arc<SpectrumSession>> {
        self.inner.read().await.by_id.get(&id).cloned()
    }

    /// Drop a session; returns whether it existed
    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.by_id.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.by_id.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Creation time of the oldest live session, next in line for eviction
    pub async fn oldest_created_at(&self) -> Option<DateTime<Utc>> {
        self.inner
            .read()
            .await
            .by_id
            .values()
            .min_by_key(|s| s.seq)
            .map(|s| s.created_at)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
