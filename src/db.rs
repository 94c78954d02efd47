use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect(database_url).await?;

    // Run migrations manually (simple SQL)
    run_migrations(&db).await?;

    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id TEXT PRIMARY KEY NOT NULL,
            title TEXT NOT NULL,
            author TEXT,
            isbn TEXT,
            summary TEXT,
            publication_year INTEGER
        )
        "#
        .to_owned(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS feedbacks (
            id TEXT PRIMARY KEY NOT NULL,
            comment TEXT NOT NULL,
            name TEXT,
            email TEXT,
            rating INTEGER
        )
        "#
        .to_owned(),
    ))
    .await?;

    tracing::debug!("Database schema ready");

    Ok(())
}
