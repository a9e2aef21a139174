use super::*;

/// Tests self-registration as a regular user.
///
/// Expected: account created with the user role and an avatar
#[tokio::test]
async fn registers_user() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = UserService::new(db)
        .register(registration("jane", "user"), None)
        .await?;

    assert_eq!(user.username, "jane");
    assert_eq!(user.role, Role::User);
    assert!(!user.avatar.is_empty());

    Ok(())
}

/// Tests registering a manager with and without an admin caller.
///
/// Expected: anonymous caller forbidden, admin caller allowed
#[tokio::test]
async fn only_admin_creates_managers() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let admin = domain(factory::user::create_user_with_role(db, "admin").await?);
    let service = UserService::new(db);

    let denied = service.register(registration("mike", "manager"), None).await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let manager = service
        .register(registration("mike", "manager"), Some(&admin))
        .await?;
    assert_eq!(manager.role, Role::Manager);

    Ok(())
}

/// Tests that registration never creates admins.
///
/// Expected: Err(AppError::Forbidden) even for an admin caller
#[tokio::test]
async fn never_creates_admins() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let admin = domain(factory::user::create_user_with_role(db, "admin").await?);

    let result = UserService::new(db)
        .register(registration("root", "admin"), Some(&admin))
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));

    Ok(())
}

/// Tests registering a taken username.
///
/// Expected: Err(AppError::Conflict)
#[tokio::test]
async fn rejects_taken_username() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::user::UserFactory::new(db)
        .username("jane")
        .build()
        .await?;

    let result = UserService::new(db)
        .register(registration("jane", "user"), None)
        .await;

    assert!(matches!(result, Err(AppError::Conflict(_))));

    Ok(())
}

/// Tests a password that breaks the policy.
///
/// Expected: Err(AppError::BadRequest)
#[tokio::test]
async fn rejects_weak_password() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let mut params = registration("jane", "user");
    params.password = Some("password".to_string());

    let result = UserService::new(db).register(params, None).await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}
