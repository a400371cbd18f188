use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::debug;

use crate::auth::repo_types::{next_user_id, LoginLogEntry, User};

/// Credential store, backed by a single whole-file snapshot.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    /// Append a new user. `password` is stored as given; hashing is the
    /// caller's responsibility.
    async fn create(&self, email: &str, password: &str) -> anyhow::Result<User>;
    async fn update_password(&self, id: i64, password: &str) -> anyhow::Result<()>;
    async fn list(&self) -> anyhow::Result<Vec<User>>;
}

/// Append-only login audit log.
#[async_trait]
pub trait LoginLogStore: Send + Sync {
    async fn append(&self, user_id: i64, email: &str) -> anyhow::Result<()>;
    async fn list(&self) -> anyhow::Result<Vec<LoginLogEntry>>;
}

/// Singleton resume document, overwritten wholesale on save.
#[async_trait]
pub trait ResumeStore: Send + Sync {
    async fn load(&self) -> anyhow::Result<Value>;
    async fn save(&self, document: &Value) -> anyhow::Result<()>;
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("read {}", path.display()))?;
    let value = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse {}", path.display()))?;
    Ok(value)
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize store contents")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Create the file with `initial` contents unless it already exists.
async fn seed_if_missing<T: Serialize>(path: &Path, initial: &T) -> anyhow::Result<()> {
    if tokio::fs::try_exists(path)
        .await
        .with_context(|| format!("stat {}", path.display()))?
    {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("create {}", parent.display()))?;
    }
    write_json(path, initial).await?;
    debug!(path = %path.display(), "seeded store file");
    Ok(())
}

/// Flat-file user store. The mutex serializes each read-modify-write against
/// the file; compound flows across calls still race, which matches the
/// original's behavior.
pub struct JsonUserStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonUserStore {
    pub async fn open(path: PathBuf) -> anyhow::Result<Self> {
        seed_if_missing(&path, &Vec::<User>::new()).await?;
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }
}

#[async_trait]
impl UserStore for JsonUserStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let _guard = self.lock.lock().await;
        let users: Vec<User> = read_json(&self.path).await?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    async fn create(&self, email: &str, password: &str) -> anyhow::Result<User> {
        let _guard = self.lock.lock().await;
        let mut users: Vec<User> = read_json(&self.path).await?;
        let user = User {
            id: next_user_id(),
            email: email.to_string(),
            password: password.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        users.push(user.clone());
        write_json(&self.path, &users).await?;
        Ok(user)
    }

    async fn update_password(&self, id: i64, password: &str) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut users: Vec<User> = read_json(&self.path).await?;
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .with_context(|| format!("user {id} not found"))?;
        user.password = password.to_string();
        write_json(&self.path, &users).await
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let _guard = self.lock.lock().await;
        read_json(&self.path).await
    }
}

/// Flat-file login log.
pub struct JsonLoginLogStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonLoginLogStore {
    pub async fn open(path: PathBuf) -> anyhow::Result<Self> {
        seed_if_missing(&path, &Vec::<LoginLogEntry>::new()).await?;
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }
}

#[async_trait]
impl LoginLogStore for JsonLoginLogStore {
    async fn append(&self, user_id: i64, email: &str) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        let mut logs: Vec<LoginLogEntry> = read_json(&self.path).await?;
        logs.push(LoginLogEntry {
            user_id,
            email: email.to_string(),
            login_time: OffsetDateTime::now_utc(),
        });
        write_json(&self.path, &logs).await
    }

    async fn list(&self) -> anyhow::Result<Vec<LoginLogEntry>> {
        let _guard = self.lock.lock().await;
        read_json(&self.path).await
    }
}

/// Flat-file resume store holding one document for the whole system.
pub struct JsonResumeStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonResumeStore {
    pub async fn open(path: PathBuf) -> anyhow::Result<Self> {
        seed_if_missing(&path, &serde_json::json!({})).await?;
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }
}

#[async_trait]
impl ResumeStore for JsonResumeStore {
    async fn load(&self) -> anyhow::Result<Value> {
        let _guard = self.lock.lock().await;
        read_json(&self.path).await
    }

    async fn save(&self, document: &Value) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        write_json(&self.path, document).await
    }
}
