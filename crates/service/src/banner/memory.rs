use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use models::banner;

use crate::banner::{BannerRepository, TITLE_TAKEN};
use crate::errors::ServiceError;

/// In-memory repository used when no database is configured and throughout
/// tests. Rejects duplicate titles on write, matching the unique index the
/// SeaORM repository relies on.
#[derive(Default)]
pub struct MemoryBannerRepository {
    inner: RwLock<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    next_id: i32,
    rows: HashMap<i32, banner::Model>,
}

impl MemoryBannerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryInner {
    fn title_taken(&self, title: &str, exclude_id: Option<i32>) -> bool {
        self.rows
            .values()
            .any(|b| b.title == title && exclude_id != Some(b.id))
    }
}

#[async_trait]
impl BannerRepository for MemoryBannerRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<banner::Model>, ServiceError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.get(&id).cloned())
    }

    async fn find_by_title_contains(
        &self,
        fragment: &str,
    ) -> Result<Vec<banner::Model>, ServiceError> {
        let inner = self.inner.read().await;
        let mut found: Vec<banner::Model> = inner
            .rows
            .values()
            .filter(|b| b.title.contains(fragment))
            .cloned()
            .collect();
        found.sort_by_key(|b| b.id);
        Ok(found)
    }

    async fn exists_by_title(
        &self,
        title: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, ServiceError> {
        let inner = self.inner.read().await;
        Ok(inner.title_taken(title, exclude_id))
    }

    async fn insert(&self, title: &str, html: &str) -> Result<banner::Model, ServiceError> {
        let mut inner = self.inner.write().await;
        if inner.title_taken(title, None) {
            return Err(ServiceError::Conflict(TITLE_TAKEN.into()));
        }
        inner.next_id += 1;
        let rec = banner::Model {
            id: inner.next_id,
            title: title.to_owned(),
            html: html.to_owned(),
            created: Utc::now().into(),
            modified: None,
        };
        inner.rows.insert(rec.id, rec.clone());
        Ok(rec)
    }

    async fn update(
        &self,
        id: i32,
        title: &str,
        html: &str,
    ) -> Result<Option<banner::Model>, ServiceError> {
        let mut inner = self.inner.write().await;
        if !inner.rows.contains_key(&id) {
            return Ok(None);
        }
        if inner.title_taken(title, Some(id)) {
            return Err(ServiceError::Conflict(TITLE_TAKEN.into()));
        }
        match inner.rows.get_mut(&id) {
            Some(row) => {
                row.title = title.to_owned();
                row.html = html.to_owned();
                row.modified = Some(Utc::now().into());
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let mut inner = self.inner.write().await;
        Ok(inner.rows.remove(&id).is_some())
    }
}
