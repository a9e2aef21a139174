use super::*;

/// Tests reassigning a task and changing its status.
///
/// Expected: new assignee and status stored
#[tokio::test]
async fn reassigns_task() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let creator = factory::create_user(db).await?;
    let worker = factory::create_user(db).await?;
    let task = factory::task::TaskFactory::new(db, creator.id)
        .assigned_to(creator.id)
        .build()
        .await?;

    let repo = TaskRepository::new(db);
    let updated = repo
        .update(
            &task.uuid,
            UpdateTaskParams {
                assigned_to: Some(Some(worker.uuid.clone())),
                status: Some(TaskStatus::InProgress),
                ..Default::default()
            },
        )
        .await?
        .unwrap();

    assert_eq!(updated.assignee_id(), Some(worker.uuid.as_str()));
    assert_eq!(updated.status, TaskStatus::InProgress);
    assert_eq!(updated.title, task.title);

    Ok(())
}

/// Tests clearing the assignee, project and comments.
///
/// Expected: no assignee, no project, comments deleted
#[tokio::test]
async fn clears_assignee_project_and_comments() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let creator = factory::create_user(db).await?;
    let project = factory::create_project(db, creator.id).await?;
    let task = factory::task::TaskFactory::new(db, creator.id)
        .project(project.id)
        .assigned_to(creator.id)
        .build()
        .await?;
    factory::create_comment(db, task.id, creator.id).await?;

    let repo = TaskRepository::new(db);
    let before = repo.find_by_uuid(&task.uuid).await?.unwrap();
    assert_eq!(before.comments.len(), 1);

    let updated = repo
        .update(
            &task.uuid,
            UpdateTaskParams {
                assigned_to: Some(None),
                project: Some(None),
                clear_comments: true,
                ..Default::default()
            },
        )
        .await?
        .unwrap();

    assert!(updated.assigned_to.is_none());
    assert!(updated.project.is_none());
    assert!(updated.comments.is_empty());
    assert_eq!(entity::prelude::Comment::find().count(db).await?, 0);

    Ok(())
}

/// Tests assigning to an unknown user.
///
/// Expected: Err(AppError::NotFound), task unchanged
#[tokio::test]
async fn fails_for_unknown_assignee() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let creator = factory::create_user(db).await?;
    let task = factory::task::TaskFactory::new(db, creator.id)
        .assigned_to(creator.id)
        .build()
        .await?;

    let repo = TaskRepository::new(db);
    let result = repo
        .update(
            &task.uuid,
            UpdateTaskParams {
                assigned_to: Some(Some("missing".to_string())),
                ..Default::default()
            },
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    let unchanged = repo.find_by_uuid(&task.uuid).await?.unwrap();
    assert_eq!(unchanged.assignee_id(), Some(creator.uuid.as_str()));

    Ok(())
}
