use super::*;

fn params(username: &str) -> CreateUserParams {
    CreateUserParams {
        name: "Jane Doe".to_string(),
        username: username.to_string(),
        email: format!("{}@example.com", username),
        gender: Gender::Female,
        password_hash: "hash".to_string(),
        role: Role::Manager,
        avatar: "https://example.com/a.png".to_string(),
    }
}

/// Tests creating a user.
///
/// Verifies that the repository stores every field and assigns a fresh
/// external id.
///
/// Expected: Ok(User) with matching fields
#[tokio::test]
async fn creates_user() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let user = repo.create(params("jane")).await?;

    assert_eq!(user.username, "jane");
    assert_eq!(user.email, "jane@example.com");
    assert_eq!(user.gender, Gender::Female);
    assert_eq!(user.role, Role::Manager);
    assert!(user.last_login.is_none());
    assert!(uuid::Uuid::parse_str(&user.id).is_ok());

    let found = repo.find_by_uuid(&user.id).await?.unwrap();
    assert_eq!(found.username, user.username);

    Ok(())
}

/// Tests that the password hash is only reachable through credentials.
///
/// Expected: hash returned by find_credentials_by_username
#[tokio::test]
async fn stores_password_hash_for_login() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    repo.create(params("login")).await?;

    let credentials = repo.find_credentials_by_username("login").await?.unwrap();
    assert_eq!(credentials.password_hash, "hash");
    assert_eq!(credentials.user.username, "login");

    assert!(repo.find_credentials_by_username("nobody").await?.is_none());

    Ok(())
}

/// Tests uniqueness lookups for username and email.
///
/// Verifies that the account being edited is excluded from the check.
///
/// Expected: taken for other accounts, free for the account itself
#[tokio::test]
async fn detects_taken_username_and_email() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let user = repo.create(params("taken")).await?;

    assert!(repo.username_taken("taken", None).await?);
    assert!(!repo.username_taken("taken", Some(&user.id)).await?);
    assert!(repo.email_taken("taken@example.com", None).await?);
    assert!(!repo.email_taken("taken@example.com", Some(&user.id)).await?);
    assert!(!repo.email_taken("free@example.com", None).await?);

    Ok(())
}
