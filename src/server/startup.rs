use crate::server::{config::Config, error::AppError};

/// Connects to the Sqlite database and runs pending migrations.
///
/// Establishes a connection pool to the Sqlite database using the connection string from
/// configuration, then automatically runs all pending SeaORM migrations to ensure the database
/// schema is up-to-date. This function must complete successfully before the application can
/// access the database.
///
/// # Arguments
/// - `config` - Application configuration containing the database URL
///
/// # Returns
/// - `Ok(DatabaseConnection)` - Connected database with migrations applied
/// - `Err(Error)` - Failed to connect to database or run migrations
pub async fn connect_to_database(config: &Config) -> Result<sea_orm::DatabaseConnection, AppError> {
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ConnectOptions, Database};

    let mut opt = ConnectOptions::new(&config.database_url);
    opt.sqlx_logging(false);

    let db = Database::connect(opt).await?;

    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Makes sure the deployment has an administrator.
///
/// Registration never creates admin accounts, so when none exists one is created from
/// the `ADMIN_*` variables. Without them a warning is logged and the server starts
/// anyway.
///
/// # Arguments
/// - `db` - Database connection
/// - `config` - Application configuration carrying the optional admin seed
///
/// # Returns
/// - `Ok(())` - An admin exists, was created, or cannot be created
/// - `Err(AppError)` - Database or hashing error
pub async fn check_for_admin(
    db: &sea_orm::DatabaseConnection,
    config: &Config,
) -> Result<(), AppError> {
    use crate::{
        model::user::{Gender, Role},
        server::{
            data::user::UserRepository, model::user::CreateUserParams,
            service::{auth::hash_password, user::random_avatar},
        },
    };

    let users = UserRepository::new(db);
    if users.admin_exists().await? {
        return Ok(());
    }

    let Some(seed) = &config.admin_seed else {
        tracing::warn!(
            "No admin account exists. Set ADMIN_NAME, ADMIN_USERNAME, ADMIN_EMAIL and ADMIN_PASSWORD to create one"
        );
        return Ok(());
    };

    let admin = users
        .create(CreateUserParams {
            name: seed.name.clone(),
            username: seed.username.clone(),
            email: seed.email.clone(),
            gender: Gender::Male,
            password_hash: hash_password(seed.password.clone()).await?,
            role: Role::Admin,
            avatar: random_avatar(Gender::Male),
        })
        .await?;

    tracing::info!("Created admin account {} ({})", admin.username, admin.id);

    Ok(())
}
