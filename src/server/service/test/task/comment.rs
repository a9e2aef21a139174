use super::*;

/// Tests commenting on someone else's task.
///
/// Expected: comment stored, creator and assignee notified once each
#[tokio::test]
async fn comment_notifies_creator_and_assignee() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let creator = factory::create_user(db).await?;
    let worker = factory::create_user(db).await?;
    let commenter = factory::user::UserFactory::new(db)
        .name("Sam")
        .build()
        .await?;
    let task = factory::task::TaskFactory::new(db, creator.id)
        .title("Fix bug")
        .assigned_to(worker.id)
        .build()
        .await?;

    let comment = TaskService::new(db, &hub)
        .add_comment(
            &task.uuid,
            Some("Looks good".to_string()),
            Some(commenter.uuid.clone()),
            &domain(commenter.clone()),
        )
        .await?;

    assert_eq!(comment.content, "Looks good");
    assert_eq!(comment.author.id, commenter.uuid);
    let expected = vec!["Sam commented on a task (Fix bug)".to_string()];
    assert_eq!(messages_for(db, creator.id).await?, expected);
    assert_eq!(messages_for(db, worker.id).await?, expected);
    assert!(messages_for(db, commenter.id).await?.is_empty());

    Ok(())
}

/// Tests commenting on one's own task.
///
/// Expected: no notification
#[tokio::test]
async fn own_comment_is_silent() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let creator = factory::create_user(db).await?;
    let task = factory::task::TaskFactory::new(db, creator.id)
        .assigned_to(creator.id)
        .build()
        .await?;

    TaskService::new(db, &hub)
        .add_comment(
            &task.uuid,
            Some("Note to self".to_string()),
            Some(creator.uuid.clone()),
            &domain(creator.clone()),
        )
        .await?;

    assert!(messages_for(db, creator.id).await?.is_empty());

    Ok(())
}

/// Tests commenting in another user's name.
///
/// Expected: Err(AppError::Forbidden)
#[tokio::test]
async fn author_must_be_caller() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let creator = factory::create_user(db).await?;
    let caller = factory::create_user(db).await?;
    let task = factory::create_task(db, creator.id).await?;

    let result = TaskService::new(db, &hub)
        .add_comment(
            &task.uuid,
            Some("Hi".to_string()),
            Some(creator.uuid.clone()),
            &domain(caller),
        )
        .await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));

    Ok(())
}

/// Tests editing and deleting comments as a different user and as admin.
///
/// Expected: other user forbidden, admin allowed
#[tokio::test]
async fn only_author_or_admin_edits() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let author = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;
    let admin = factory::user::create_user_with_role(db, "admin").await?;
    let task = factory::create_task(db, author.id).await?;
    let comment = factory::create_comment(db, task.id, author.id).await?;

    let service = TaskService::new(db, &hub);
    let denied = service
        .update_comment(&comment.uuid, Some("Edited".to_string()), &domain(other.clone()))
        .await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    let edited = service
        .update_comment(&comment.uuid, Some("Edited".to_string()), &domain(admin.clone()))
        .await?;
    assert_eq!(edited.content, "Edited");

    let denied = service.delete_comment(&comment.uuid, &domain(other)).await;
    assert!(matches!(denied, Err(AppError::Forbidden(_))));

    service.delete_comment(&comment.uuid, &domain(admin)).await?;
    assert!(entity::prelude::Comment::find().all(db).await?.is_empty());

    Ok(())
}
