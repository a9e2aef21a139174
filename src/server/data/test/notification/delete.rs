use super::*;

/// Tests deleting a single notification.
///
/// Expected: Ok(true) then Ok(false)
#[tokio::test]
async fn deletes_notification() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let notification = factory::create_notification(db, user.id).await?;

    let repo = NotificationRepository::new(db);
    assert!(repo.delete(&notification.uuid).await?);
    assert!(!repo.delete(&notification.uuid).await?);

    Ok(())
}

/// Tests clearing every notification of one user.
///
/// Expected: two removed, other user's notification kept
#[tokio::test]
async fn clears_only_the_users_notifications() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;
    factory::create_notification(db, user.id).await?;
    factory::create_notification(db, user.id).await?;
    let kept = factory::create_notification(db, other.id).await?;

    let repo = NotificationRepository::new(db);
    assert_eq!(repo.delete_for_user(&user.uuid).await?, 2);
    assert_eq!(repo.delete_for_user(&user.uuid).await?, 0);
    assert!(repo.find_by_uuid(&kept.uuid).await?.is_some());

    Ok(())
}
