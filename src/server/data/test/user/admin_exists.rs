use super::*;

/// Tests detecting when admin users exist.
///
/// Expected: Ok(true)
#[tokio::test]
async fn returns_true_when_admin_exists() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::user::create_user_with_role(db, "admin").await?;

    let repo = UserRepository::new(db);
    assert!(repo.admin_exists().await?);

    Ok(())
}

/// Tests detecting when only non-admin users exist.
///
/// Verifies that managers do not count as admins (first start scenario).
///
/// Expected: Ok(false)
#[tokio::test]
async fn returns_false_with_only_regular_users() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_user(db).await?;
    factory::user::create_user_with_role(db, "manager").await?;

    let repo = UserRepository::new(db);
    assert!(!repo.admin_exists().await?);

    Ok(())
}
