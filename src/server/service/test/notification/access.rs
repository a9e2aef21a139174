use super::*;

/// Tests listing another user's notifications as a regular user.
///
/// Expected: Err(AppError::Forbidden)
#[tokio::test]
async fn cannot_list_foreign_notifications() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let owner = factory::create_user(db).await?;
    let caller = factory::create_user(db).await?;
    factory::create_notification(db, owner.id).await?;

    let result = NotificationService::new(db, &hub)
        .list_for_user(&owner.uuid, None, &domain(caller), first_page())
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));

    Ok(())
}

/// Tests the unread-only listing.
///
/// Expected: only unread notifications returned
#[tokio::test]
async fn lists_unread_only() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let user = factory::create_user(db).await?;
    let unread = factory::create_notification(db, user.id).await?;
    factory::notification::NotificationFactory::new(db, user.id)
        .read(true)
        .build()
        .await?;

    let page = NotificationService::new(db, &hub)
        .list_for_user(&user.uuid, Some(true), &domain(user.clone()), first_page())
        .await?;

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, unread.uuid);

    Ok(())
}

/// Tests marking and deleting another user's notification.
///
/// Expected: regular user forbidden, admin allowed
#[tokio::test]
async fn only_recipient_or_admin_modifies() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let owner = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;
    let admin = factory::user::create_user_with_role(db, "admin").await?;
    let notification = factory::create_notification(db, owner.id).await?;

    let service = NotificationService::new(db, &hub);
    let denied = service
        .set_read(&notification.uuid, true, &domain(other.clone()))
        .await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let read = service
        .set_read(&notification.uuid, true, &domain(admin.clone()))
        .await?;
    assert!(read.is_read);

    let denied = service.delete(&notification.uuid, &domain(other)).await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    service.delete(&notification.uuid, &domain(admin)).await?;

    Ok(())
}

/// Tests clearing a user's notifications twice.
///
/// Expected: first call deletes them, second is Err(AppError::NotFound)
#[tokio::test]
async fn clear_then_nothing_left() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let user = factory::create_user(db).await?;
    factory::create_notification(db, user.id).await?;
    factory::create_notification(db, user.id).await?;

    let service = NotificationService::new(db, &hub);
    let caller = domain(user.clone());

    assert_eq!(service.clear(&user.uuid, &caller).await?, 2);
    let result = service.clear(&user.uuid, &caller).await;
    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}

/// Tests the by-type listing for a regular user.
///
/// Expected: type required, and only the caller's own notifications listed
#[tokio::test]
async fn by_kind_scoped_to_caller() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let user = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;
    factory::notification::NotificationFactory::new(db, user.id)
        .kind("warning")
        .build()
        .await?;
    factory::notification::NotificationFactory::new(db, other.id)
        .kind("warning")
        .build()
        .await?;

    let service = NotificationService::new(db, &hub);
    let caller = domain(user.clone());

    let missing = service.list_by_kind(None, &caller, first_page()).await;
    assert!(matches!(missing, Err(AppError::BadRequest(_))));

    let page = service
        .list_by_kind(Some("warning".to_string()), &caller, first_page())
        .await?;
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].user, user.uuid);

    Ok(())
}
