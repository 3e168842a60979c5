use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use models::banner;

use crate::banner::TITLE_TAKEN;
use crate::errors::ServiceError;

/// Persistence access for banner records. Callers treat every operation as
/// complete once it returns; store failures surface as `ServiceError::Db`
/// and are not handled at this layer.
#[async_trait]
pub trait BannerRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<banner::Model>, ServiceError>;
    /// Case-sensitive substring match on title.
    async fn find_by_title_contains(
        &self,
        fragment: &str,
    ) -> Result<Vec<banner::Model>, ServiceError>;
    /// Exact title match, optionally ignoring one record so an update can
    /// keep its own title.
    async fn exists_by_title(
        &self,
        title: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, ServiceError>;
    /// Assigns the id and `created`, leaves `modified` unset.
    async fn insert(&self, title: &str, html: &str) -> Result<banner::Model, ServiceError>;
    /// Sets `modified`; `None` when the id does not exist.
    async fn update(
        &self,
        id: i32,
        title: &str,
        html: &str,
    ) -> Result<Option<banner::Model>, ServiceError>;
    /// False when the id does not exist.
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
}

/// SeaORM-backed repository implementation. The `banner` table carries a
/// unique index on title; a violation maps to `Conflict` rather than `Db`.
pub struct SeaOrmBannerRepository {
    db: DatabaseConnection,
}

impl SeaOrmBannerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn map_db_err(e: DbErr) -> ServiceError {
    let msg = e.to_string();
    let lower = msg.to_ascii_lowercase();
    if lower.contains("unique") || lower.contains("duplicate") {
        ServiceError::Conflict(TITLE_TAKEN.into())
    } else {
        ServiceError::Db(msg)
    }
}

#[async_trait]
impl BannerRepository for SeaOrmBannerRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<banner::Model>, ServiceError> {
        banner::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn find_by_title_contains(
        &self,
        fragment: &str,
    ) -> Result<Vec<banner::Model>, ServiceError> {
        banner::Entity::find()
            .filter(banner::Column::Title.contains(fragment))
            .order_by_asc(banner::Column::Id)
            .all(&self.db)
            .await
            .map_err(map_db_err)
    }

    async fn exists_by_title(
        &self,
        title: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, ServiceError> {
        let mut query = banner::Entity::find().filter(banner::Column::Title.eq(title));
        if let Some(id) = exclude_id {
            query = query.filter(banner::Column::Id.ne(id));
        }
        let count = query.count(&self.db).await.map_err(map_db_err)?;
        Ok(count > 0)
    }

    async fn insert(&self, title: &str, html: &str) -> Result<banner::Model, ServiceError> {
        let am = banner::ActiveModel {
            id: NotSet,
            title: Set(title.to_owned()),
            html: Set(html.to_owned()),
            created: Set(Utc::now().into()),
            modified: Set(None),
        };
        am.insert(&self.db).await.map_err(map_db_err)
    }

    async fn update(
        &self,
        id: i32,
        title: &str,
        html: &str,
    ) -> Result<Option<banner::Model>, ServiceError> {
        let Some(existing) = banner::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(map_db_err)?
        else {
            return Ok(None);
        };

        let mut am: banner::ActiveModel = existing.into();
        am.title = Set(title.to_owned());
        am.html = Set(html.to_owned());
        am.modified = Set(Some(Utc::now().into()));
        let updated = am.update(&self.db).await.map_err(map_db_err)?;
        Ok(Some(updated))
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        let res = banner::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;
        Ok(res.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::*;
    use crate::test_support::get_db;

    fn unique_title(tag: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock")
            .as_nanos();
        format!("it-{}-{}", tag, nanos)
    }

    #[tokio::test]
    async fn seaorm_repository_roundtrip() {
        let Some(db) = get_db().await else {
            eprintln!("DATABASE_URL missing; skipping seaorm repository test");
            return;
        };
        let repo = SeaOrmBannerRepository::new(db);
        let title = unique_title("roundtrip");

        let created = repo.insert(&title, "<p>x</p>").await.expect("insert");
        assert!(created.id > 0);
        assert!(created.modified.is_none());

        assert!(repo.exists_by_title(&title, None).await.expect("exists"));
        assert!(!repo.exists_by_title(&title, Some(created.id)).await.expect("exists"));

        let hits = repo.find_by_title_contains(&title).await.expect("query");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, created.id);

        let updated = repo
            .update(created.id, &title, "<p>changed</p>")
            .await
            .expect("update")
            .expect("present");
        assert_eq!(updated.html, "<p>changed</p>");
        assert!(updated.modified.is_some());

        assert!(repo.delete(created.id).await.expect("delete"));
        assert!(!repo.exists_by_title(&title, None).await.expect("exists"));
        assert!(!repo.delete(created.id).await.expect("delete again"));
    }

    #[tokio::test]
    async fn seaorm_unique_index_maps_to_conflict() {
        let Some(db) = get_db().await else {
            eprintln!("DATABASE_URL missing; skipping seaorm conflict test");
            return;
        };
        let repo = SeaOrmBannerRepository::new(db);
        let title = unique_title("conflict");

        let created = repo.insert(&title, "<p>x</p>").await.expect("insert");
        let err = repo.insert(&title, "<p>other</p>").await.expect_err("dup");
        assert!(matches!(err, ServiceError::Conflict(_)));

        repo.delete(created.id).await.expect("cleanup");
    }
}
