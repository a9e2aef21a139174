use super::*;

/// Tests reassigning a task to another user.
///
/// Expected: status in-progress, new assignee told "assigned", old one "unassigned"
#[tokio::test]
async fn reassign_notifies_both_sides() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let creator = factory::create_user(db).await?;
    let old = factory::create_user(db).await?;
    let new = factory::create_user(db).await?;
    let task = factory::task::TaskFactory::new(db, creator.id)
        .title("Fix bug")
        .assigned_to(old.id)
        .build()
        .await?;

    let updated = TaskService::new(db, &hub)
        .update(
            &task.uuid,
            UpdateTaskParams {
                assigned_to: Some(Some(new.uuid.clone())),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(updated.assignee_id(), Some(new.uuid.as_str()));
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(
        messages_for(db, new.id).await?,
        vec!["You have been assigned to a task (Fix bug)".to_string()]
    );
    assert_eq!(
        messages_for(db, old.id).await?,
        vec!["You have been unassigned from a task (Fix bug)".to_string()]
    );

    Ok(())
}

/// Tests clearing the assignee.
///
/// Expected: status back to pending, old assignee notified
#[tokio::test]
async fn unassign_resets_status() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let creator = factory::create_user(db).await?;
    let worker = factory::create_user(db).await?;
    let task = factory::task::TaskFactory::new(db, creator.id)
        .title("Fix bug")
        .status("in-progress")
        .assigned_to(worker.id)
        .build()
        .await?;

    let updated = TaskService::new(db, &hub)
        .update(
            &task.uuid,
            UpdateTaskParams {
                assigned_to: Some(None),
                ..Default::default()
            },
        )
        .await?;

    assert!(updated.assigned_to.is_none());
    assert_eq!(updated.status, TaskStatus::Pending);
    assert_eq!(
        messages_for(db, worker.id).await?,
        vec!["You have been unassigned from a task (Fix bug)".to_string()]
    );

    Ok(())
}

/// Tests that an explicit status wins over the one implied by reassignment.
///
/// Expected: requested status stored
#[tokio::test]
async fn explicit_status_wins() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let creator = factory::create_user(db).await?;
    let worker = factory::create_user(db).await?;
    let task = factory::task::TaskFactory::new(db, creator.id)
        .assigned_to(creator.id)
        .build()
        .await?;

    let updated = TaskService::new(db, &hub)
        .update(
            &task.uuid,
            UpdateTaskParams {
                assigned_to: Some(Some(worker.uuid.clone())),
                status: Some(TaskStatus::Completed),
                ..Default::default()
            },
        )
        .await?;

    assert_eq!(updated.status, TaskStatus::Completed);

    Ok(())
}

/// Tests updating a task that does not exist.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn fails_for_unknown_task() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let result = TaskService::new(db, &hub)
        .update(&factory::helpers::new_uuid(), UpdateTaskParams::default())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
