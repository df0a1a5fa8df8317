//! Favorite lessons, persisted as a JSON list of ids

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::RwLock;

use crate::catalog::LessonId;

#[derive(Clone)]
pub struct FavoritesStore {
    path: PathBuf,
    ids: Arc<RwLock<BTreeSet<LessonId>>>,
}

impl FavoritesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ids: Arc::new(RwLock::new(BTreeSet::new())),
        }
    }

    pub async fn load_from_disk(&self) -> Result<()> {
        if !self.path.exists() {
            return Ok(());
        }
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("reading {}", self.path.display()))?;
        let ids: Vec<LessonId> = serde_json::from_str(&content)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        tracing::debug!(count = ids.len(), "Favorites loaded");
        *self.ids.write().await = ids.into_iter().collect();
        Ok(())
    }

    pub async fn save_to_disk(&self) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        let content = {
            let ids = self.ids.read().await;
            serde_json::to_string_pretty(&*ids)?
        };
        tokio::fs::write(&self.path, content)
            .await
            .with_context(|| format!("writing {}", self.path.display()))?;
        Ok(())
    }

    pub async fn contains(&self, id: &LessonId) -> bool {
        self.ids.read().await.contains(id)
    }

    /// Flip the id in or out; returns whether it is now a favorite.
    pub async fn toggle(&self, id: &LessonId) -> bool {
        let mut ids = self.ids.write().await;
        if ids.remove(id) {
            false
        } else {
            ids.insert(id.clone());
            true
        }
    }

    pub async fn ids(&self) -> BTreeSet<LessonId> {
        self.ids.read().await.clone()
    }
}
