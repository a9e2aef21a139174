use super::*;

/// Tests that any logged in user passes an empty permission list.
///
/// Expected: Ok(User) for the token's user
#[tokio::test]
async fn grants_access_with_raw_token() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let keys = JwtKeys::new(SECRET);

    let user = factory::create_user(db).await?;
    let headers = headers_with(&token_for(&keys, user.clone()));

    let caller = AuthGuard::new(db, &keys, &headers).require(&[]).await?;

    assert_eq!(caller.id, user.uuid);

    Ok(())
}

/// Tests that the `Bearer` prefix is accepted.
///
/// Expected: Ok(User)
#[tokio::test]
async fn accepts_bearer_prefix() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let keys = JwtKeys::new(SECRET);

    let user = factory::create_user(db).await?;
    let headers = headers_with(&format!("Bearer {}", token_for(&keys, user.clone())));

    let caller = AuthGuard::new(db, &keys, &headers).require(&[]).await?;

    assert_eq!(caller.username, user.username);

    Ok(())
}

/// Tests a request without authorization header.
///
/// Expected: Err(AuthError::MissingToken)
#[tokio::test]
async fn denies_access_without_token() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let keys = JwtKeys::new(SECRET);
    let headers = HeaderMap::new();

    let result = AuthGuard::new(db, &keys, &headers).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::MissingToken))
    ));

    Ok(())
}

/// Tests an expired token.
///
/// Expected: Err(AuthError::SessionExpired)
#[tokio::test]
async fn denies_access_with_expired_token() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let keys = JwtKeys::new(SECRET);

    let user = User::from_entity(factory::create_user(db).await?).unwrap();
    let token = keys.issue(&user, Utc::now() - Duration::hours(2))?;
    let headers = headers_with(&token);

    let result = AuthGuard::new(db, &keys, &headers).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::SessionExpired))
    ));

    Ok(())
}

/// Tests a token signed with a different secret.
///
/// Expected: Err(AuthError::InvalidCredentials)
#[tokio::test]
async fn denies_access_with_forged_token() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let keys = JwtKeys::new(SECRET);

    let user = factory::create_user(db).await?;
    let headers = headers_with(&token_for(&JwtKeys::new("other-secret"), user));

    let result = AuthGuard::new(db, &keys, &headers).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::InvalidCredentials))
    ));

    Ok(())
}

/// Tests a valid token whose user has been deleted.
///
/// Expected: Err(AuthError::UserNotInDatabase) carrying the user's external id
#[tokio::test]
async fn denies_access_when_user_not_in_database() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let keys = JwtKeys::new(SECRET);

    let user = factory::create_user(db).await?;
    let uuid = user.uuid.clone();
    let headers = headers_with(&token_for(&keys, user));
    crate::server::data::user::UserRepository::new(db)
        .delete(&uuid)
        .await?;

    let result = AuthGuard::new(db, &keys, &headers).require(&[]).await;

    match result {
        Err(AppError::AuthErr(AuthError::UserNotInDatabase(id))) => assert_eq!(id, uuid),
        other => panic!("Expected UserNotInDatabase error, got: {:?}", other),
    }

    Ok(())
}

/// Tests the manager permission for each role.
///
/// Expected: managers and admins pass, plain users are denied
#[tokio::test]
async fn manager_permission_admits_managers_and_admins() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let keys = JwtKeys::new(SECRET);

    for (role, allowed) in [("user", false), ("manager", true), ("admin", true)] {
        let user = factory::user::create_user_with_role(db, role).await?;
        let headers = headers_with(&token_for(&keys, user));

        let result = AuthGuard::new(db, &keys, &headers)
            .require(&[Permission::Manager])
            .await;

        assert_eq!(result.is_ok(), allowed, "role {}", role);
    }

    Ok(())
}

/// Tests that a manager is denied an admin route.
///
/// Expected: Err(AuthError::AccessDenied) naming the required role
#[tokio::test]
async fn denies_admin_route_to_manager() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let keys = JwtKeys::new(SECRET);

    let manager = factory::user::create_user_with_role(db, "manager").await?;
    let uuid = manager.uuid.clone();
    let headers = headers_with(&token_for(&keys, manager));

    let result = AuthGuard::new(db, &keys, &headers)
        .require(&[Permission::Admin])
        .await;

    match result {
        Err(AppError::AuthErr(AuthError::AccessDenied(id, message))) => {
            assert_eq!(id, uuid);
            assert!(message.contains("admin"));
        }
        other => panic!("Expected AccessDenied error, got: {:?}", other),
    }

    Ok(())
}
