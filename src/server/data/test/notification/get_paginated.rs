use super::*;

/// Tests listing a user's notifications newest first.
///
/// Expected: only the user's notifications, newest first
#[tokio::test]
async fn lists_user_notifications_newest_first() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;
    let older = factory::notification::NotificationFactory::new(db, user.id)
        .created_at(Utc::now() - Duration::hours(1))
        .build()
        .await?;
    let newer = factory::create_notification(db, user.id).await?;
    factory::create_notification(db, other.id).await?;

    let repo = NotificationRepository::new(db);
    let page = repo
        .get_paginated(
            &NotificationFilter {
                user: Some(user.uuid.clone()),
                ..Default::default()
            },
            PageRequest { page: 1, limit: 10 },
        )
        .await?;

    assert_eq!(page.total, 2);
    let ids: Vec<&str> = page.items.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec![newer.uuid.as_str(), older.uuid.as_str()]);

    let all = repo
        .get_paginated(&NotificationFilter::default(), PageRequest { page: 1, limit: 10 })
        .await?;
    assert_eq!(all.total, 3);

    Ok(())
}

/// Tests filtering by type and read state.
///
/// Expected: only the unread admin notification
#[tokio::test]
async fn filters_by_kind_and_read_state() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let target = factory::notification::NotificationFactory::new(db, user.id)
        .kind("admin")
        .build()
        .await?;
    factory::notification::NotificationFactory::new(db, user.id)
        .kind("admin")
        .read(true)
        .build()
        .await?;
    factory::create_notification(db, user.id).await?;

    let repo = NotificationRepository::new(db);
    let page = repo
        .get_paginated(
            &NotificationFilter {
                user: Some(user.uuid.clone()),
                kind: Some(NotificationKind::Admin),
                is_read: Some(false),
            },
            PageRequest { page: 1, limit: 10 },
        )
        .await?;

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, target.uuid);

    Ok(())
}

/// Tests requesting a page far past the end.
///
/// Expected: empty page with the real total, no database error
#[tokio::test]
async fn huge_page_is_empty() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    factory::create_notification(db, user.id).await?;

    let page = NotificationRepository::new(db)
        .get_paginated(
            &NotificationFilter::default(),
            PageRequest::from_query(Some(u64::MAX.to_string()), Some("10".to_string()), 10),
        )
        .await?;

    assert!(page.is_empty());
    assert_eq!(page.total, 1);

    Ok(())
}
