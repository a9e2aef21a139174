use super::*;

/// Tests creating a task inside a project.
///
/// Expected: Ok(TaskDetails) with project, assignee and creator expanded
#[tokio::test]
async fn creates_task_with_references() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (creator, project, members) = factory::helpers::create_project_with_members(db, 1).await?;
    let due = Utc::now() + Duration::days(2);

    let repo = TaskRepository::new(db);
    let task = repo
        .create(CreateTaskParams {
            title: "Write report".to_string(),
            description: Some("Quarterly".to_string()),
            status: TaskStatus::InProgress,
            priority: TaskPriority::High,
            due_date: Some(due),
            project: Some(project.uuid.clone()),
            assigned_to: members[0].uuid.clone(),
            created_by: creator.uuid.clone(),
        })
        .await?;

    assert_eq!(task.title, "Write report");
    assert_eq!(task.status, TaskStatus::InProgress);
    assert_eq!(task.priority, TaskPriority::High);
    assert_eq!(task.project.as_ref().map(|p| p.id.as_str()), Some(project.uuid.as_str()));
    assert_eq!(task.assignee_id(), Some(members[0].uuid.as_str()));
    assert_eq!(task.created_by.id, creator.uuid);
    assert!(task.comments.is_empty());

    Ok(())
}

/// Tests creating a task for an unknown project.
///
/// Expected: Err(AppError::NotFound) and no task stored
#[tokio::test]
async fn fails_for_unknown_project() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let creator = factory::create_user(db).await?;

    let repo = TaskRepository::new(db);
    let result = repo
        .create(CreateTaskParams {
            title: "Orphan".to_string(),
            description: None,
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            due_date: None,
            project: Some("missing".to_string()),
            assigned_to: creator.uuid.clone(),
            created_by: creator.uuid.clone(),
        })
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(entity::prelude::Task::find().count(db).await?, 0);

    Ok(())
}
