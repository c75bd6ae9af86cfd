//! In-memory session registry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::narrative::NarrativeGenerator;
use crate::questionnaire::QuestionnaireManager;
use crate::sink::ResultSink;

struct Entry {
    manager: Arc<QuestionnaireManager>,
    last_seen: Instant,
}

/// All live sessions plus the collaborators new sessions are wired to.
pub struct SessionRegistry {
    catalog: Arc<Catalog>,
    generator: Arc<dyn NarrativeGenerator>,
    sink: Arc<dyn ResultSink>,
    sessions: RwLock<HashMap<Uuid, Entry>>,
}

impl SessionRegistry {
    pub fn new(
        catalog: Arc<Catalog>,
        generator: Arc<dyn NarrativeGenerator>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            catalog,
            generator,
            sink,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Start a new session at the first question.
    pub async fn create(&self) -> Arc<QuestionnaireManager> {
        let manager = Arc::new(QuestionnaireManager::new(
            Arc::clone(&self.catalog),
            Arc::clone(&self.generator),
            Arc::clone(&self.sink),
        ));
        self.sessions.write().await.insert(
            manager.id(),
            Entry {
                manager: Arc::clone(&manager),
                last_seen: Instant::now(),
            },
        );
        tracing::info!(session_id = %manager.id(), "Session created");
        manager
    }

    /// Look up a session and mark it as active.
    pub async fn get(&self, id: Uuid) -> Option<Arc<QuestionnaireManager>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.get_mut(&id)?;
        entry.last_seen = Instant::now();
        Some(Arc::clone(&entry.manager))
    }

    /// Drop sessions not looked up within `max_idle`. Returns how many were
    /// removed. A generation already in flight keeps its own handle and
    /// finishes regardless.
    pub async fn expire_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|id, entry| {
            let keep = entry.last_seen.elapsed() < max_idle;
            if !keep {
                tracing::debug!(session_id = %id, "Session expired");
            }
            keep
        });
        before - sessions.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Spawn a background task that periodically drops idle sessions.
pub fn spawn_expiry_task(
    registry: Arc<SessionRegistry>,
    max_idle: Duration,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.tick().await;
        loop {
            interval.tick().await;
            let expired = registry.expire_idle(max_idle).await;
            if expired > 0 {
                tracing::info!(expired, "Expired idle sessions");
            }
        }
    })
}
