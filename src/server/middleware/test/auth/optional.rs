use super::*;

/// Tests an anonymous request.
///
/// Expected: Ok(None)
#[tokio::test]
async fn anonymous_caller_is_none() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let keys = JwtKeys::new(SECRET);
    let headers = HeaderMap::new();

    let caller = AuthGuard::new(db, &keys, &headers).optional().await?;

    assert!(caller.is_none());

    Ok(())
}

/// Tests a request with a valid token.
///
/// Expected: Ok(Some(User))
#[tokio::test]
async fn resolves_logged_in_caller() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let keys = JwtKeys::new(SECRET);

    let admin = factory::user::create_user_with_role(db, "admin").await?;
    let headers = headers_with(&token_for(&keys, admin.clone()));

    let caller = AuthGuard::new(db, &keys, &headers).optional().await?;

    assert_eq!(caller.map(|user| user.id), Some(admin.uuid));

    Ok(())
}

/// Tests that a broken token is not silently treated as anonymous.
///
/// Expected: Err(AuthError::InvalidCredentials)
#[tokio::test]
async fn invalid_token_is_an_error() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let keys = JwtKeys::new(SECRET);
    let headers = headers_with("not-a-token");

    let result = AuthGuard::new(db, &keys, &headers).optional().await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::InvalidCredentials))
    ));

    Ok(())
}
