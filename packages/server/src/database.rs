use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Schema,
};

use crate::entity;

/// Connect to the archive database and make sure its schema exists.
pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    opt.max_connections(10)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .sqlx_logging(false);

    let db = Database::connect(opt).await?;
    create_schema(&db).await?;

    Ok(db)
}

/// Create all archive tables from the entity definitions.
///
/// Statements are ordered so referenced tables exist before the join tables
/// that carry foreign keys into them. `IF NOT EXISTS` keeps restarts
/// idempotent.
pub async fn create_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut statements = vec![
        schema.create_table_from_entity(entity::document::Entity),
        schema.create_table_from_entity(entity::course::Entity),
        schema.create_table_from_entity(entity::course_alias::Entity),
        schema.create_table_from_entity(entity::folder::Entity),
        schema.create_table_from_entity(entity::author::Entity),
        schema.create_table_from_entity(entity::item::Entity),
        schema.create_table_from_entity(entity::item_document::Entity),
        schema.create_table_from_entity(entity::item_author::Entity),
        schema.create_table_from_entity(entity::item_course::Entity),
        schema.create_table_from_entity(entity::item_folder::Entity),
    ];

    for stmt in statements.iter_mut() {
        stmt.if_not_exists();
        db.execute(builder.build(&*stmt)).await?;
    }

    Ok(())
}
