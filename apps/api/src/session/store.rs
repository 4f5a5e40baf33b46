use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};
use uuid::Uuid;

use crate::session::{Session, SessionError, SessionStore};

const KEY_PREFIX: &str = "career:session:";

/// Process-local sessions, expiring after `ttl` without a save. Lost on restart.
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, (Session, Instant)>>,
    ttl: Duration,
}

impl InMemorySessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: Duration::from_secs(ttl_secs),
        }
    }

    fn is_live(&self, saved_at: Instant) -> bool {
        saved_at.elapsed() < self.ttl
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn load(&self, id: Uuid) -> Result<Option<Session>, SessionError> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(&id)
            .filter(|(_, saved_at)| self.is_live(*saved_at))
            .map(|(session, _)| session.clone()))
    }

    async fn save(&self, session: &Session) -> Result<(), SessionError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, (_, saved_at)| self.is_live(*saved_at));
        let evicted = before - sessions.len();
        if evicted > 0 {
            debug!("Evicted {evicted} expired in-memory sessions");
        }
        sessions.insert(session.id, (session.clone(), Instant::now()));
        Ok(())
    }
}

/// Sessions stored as JSON strings in Redis, expiring after `ttl_secs` of inactivity.
pub struct RedisSessionStore {
    connection: MultiplexedConnection,
    ttl_secs: u64,
}

impl RedisSessionStore {
    pub async fn connect(url: &str, ttl_secs: u64) -> Result<Self, SessionError> {
        let client = redis::Client::open(url)?;
        let connection = client.get_multiplexed_async_connection().await?;
        info!("Redis session store connected (ttl {ttl_secs}s)");
        Ok(Self {
            connection,
            ttl_secs,
        })
    }
}

fn session_key(id: Uuid) -> String {
    format!("{KEY_PREFIX}{id}")
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn load(&self, id: Uuid) -> Result<Option<Session>, SessionError> {
        let mut conn = self.connection.clone();
        let raw: Option<String> = redis::cmd("GET")
            .arg(session_key(id))
            .query_async(&mut conn)
            .await?;
        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(SessionError::from)
    }

    async fn save(&self, session: &Session) -> Result<(), SessionError> {
        let json = serde_json::to_string(session)?;
        let mut conn = self.connection.clone();
        redis::cmd("SET")
            .arg(session_key(session.id))
            .arg(json)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut conn)
            .await?;
        Ok(())
    }
}
