use super::*;

/// Tests creating a task without an assignee.
///
/// Expected: task assigned to its creator with default status and priority, nobody notified
#[tokio::test]
async fn assigns_creator_by_default() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let creator = factory::create_user(db).await?;

    let task = TaskService::new(db, &hub)
        .create(NewTaskParams {
            title: Some("Write report".to_string()),
            created_by: Some(creator.uuid.clone()),
            ..Default::default()
        })
        .await?;

    assert_eq!(task.assignee_id(), Some(creator.uuid.as_str()));
    assert_eq!(task.status, TaskStatus::Pending);
    assert_eq!(task.priority, TaskPriority::Medium);
    assert!(messages_for(db, creator.id).await?.is_empty());

    Ok(())
}

/// Tests creating a task for another user.
///
/// Expected: assignee notified about the task
#[tokio::test]
async fn notifies_assignee() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let creator = factory::create_user(db).await?;
    let worker = factory::create_user(db).await?;

    TaskService::new(db, &hub)
        .create(NewTaskParams {
            title: Some("Write report".to_string()),
            created_by: Some(creator.uuid.clone()),
            assigned_to: Some(worker.uuid.clone()),
            ..Default::default()
        })
        .await?;

    assert_eq!(
        messages_for(db, worker.id).await?,
        vec!["You have been assigned to a task (Write report)".to_string()]
    );

    Ok(())
}

/// Tests creating a task without a title.
///
/// Expected: Err(AppError::BadRequest)
#[tokio::test]
async fn requires_title() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let creator = factory::create_user(db).await?;

    let result = TaskService::new(db, &hub)
        .create(NewTaskParams {
            created_by: Some(creator.uuid.clone()),
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests creating a task in a project that does not exist.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn fails_for_unknown_project() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let creator = factory::create_user(db).await?;

    let result = TaskService::new(db, &hub)
        .create(NewTaskParams {
            title: Some("Write report".to_string()),
            created_by: Some(creator.uuid.clone()),
            project: Some(factory::helpers::new_uuid()),
            ..Default::default()
        })
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
