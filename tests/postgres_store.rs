//! Runs the storage invariants against a real Postgres when
//! `TEST_DATABASE_URL` is set; skips silently otherwise.

use anyhow::Result;
use entity::employees;
use migration::{Migrator, MigratorTrait};
use platform_db::DbPool;
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, Database, DatabaseBackend, EntityTrait, NotSet, Set,
    Statement,
};
use url::Url;
use uuid::Uuid;

struct PgTestContext {
    db: DbPool,
    admin_url: String,
    db_name: String,
}

impl PgTestContext {
    async fn new() -> Option<Self> {
        let base = std::env::var("TEST_DATABASE_URL").ok()?;
        let (admin_url, db_name, test_url) = build_urls(&base)?;
        let admin = Database::connect(&admin_url).await.ok()?;
        let drop_sql = format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE);", db_name);
        let create_sql = format!("CREATE DATABASE \"{}\";", db_name);
        let _ = admin
            .execute(Statement::from_string(DatabaseBackend::Postgres, drop_sql))
            .await;
        admin
            .execute(Statement::from_string(
                DatabaseBackend::Postgres,
                create_sql,
            ))
            .await
            .ok()?;
        let db = Database::connect(&test_url).await.ok()?;
        Migrator::up(&db, None).await.ok()?;
        Some(Self {
            db,
            admin_url,
            db_name,
        })
    }

    async fn cleanup(self) {
        let Self {
            db,
            admin_url,
            db_name,
        } = self;
        drop(db);
        if let Ok(admin) = Database::connect(&admin_url).await {
            let drop_sql = format!("DROP DATABASE IF EXISTS \"{}\" WITH (FORCE);", db_name);
            let _ = admin
                .execute(Statement::from_string(DatabaseBackend::Postgres, drop_sql))
                .await;
        }
    }
}

fn build_urls(base: &str) -> Option<(String, String, String)> {
    let url = Url::parse(base).ok()?;
    let db_path = url.path().trim_start_matches('/').to_string();
    let base_name = if db_path.is_empty() {
        "employee_service_test".to_string()
    } else {
        db_path
    };
    let db_name = format!("{}_{}", base_name, Uuid::new_v4().simple());
    let mut admin_url = url.clone();
    admin_url.set_path("/postgres");
    let mut test_url = url.clone();
    test_url.set_path(&format!("/{}", db_name));
    Some((admin_url.to_string(), db_name, test_url.to_string()))
}

#[tokio::test]
async fn employees_roundtrip_on_postgres() -> Result<()> {
    let Some(ctx) = PgTestContext::new().await else {
        return Ok(());
    };

    let saved = employees::ActiveModel {
        id: NotSet,
        first_name: Set("Bernard".to_string()),
        last_name: Set("Comolet".to_string()),
        email: Set("comolet@mail.com".to_string()),
    }
    .insert(&ctx.db)
    .await?;
    assert!(saved.id > 0);

    let duplicate = employees::ActiveModel {
        id: NotSet,
        first_name: Set("Impostor".to_string()),
        last_name: Set("Comolet".to_string()),
        email: Set("comolet@mail.com".to_string()),
    }
    .insert(&ctx.db)
    .await;
    assert!(duplicate.is_err(), "unique index must reject the email");

    let updated = employees::ActiveModel {
        id: Set(saved.id),
        first_name: Set(saved.first_name.clone()),
        last_name: Set(saved.last_name.clone()),
        email: Set("updated@mail.com".to_string()),
    }
    .update(&ctx.db)
    .await?;
    assert_eq!(updated.email, "updated@mail.com");

    employees::Entity::delete_by_id(saved.id)
        .exec(&ctx.db)
        .await?;
    let gone = employees::Entity::find_by_id(saved.id).one(&ctx.db).await?;
    assert!(gone.is_none());

    ctx.cleanup().await;
    Ok(())
}
