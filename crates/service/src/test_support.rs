#![cfg(test)]
use migration::MigratorTrait;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connection for DB-backed tests, or `None` when no `DATABASE_URL` is set
/// (callers skip in that case).
pub async fn get_db() -> Option<DatabaseConnection> {
    let url = models::db::DATABASE_URL.clone()?;

    let migrate_url = url.clone();
    MIGRATED
        .get_or_init(|| async move {
            let db = models::db::connect(&migrate_url)
                .await
                .expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
            drop(db);
        })
        .await;

    models::db::connect(&url).await.ok()
}
