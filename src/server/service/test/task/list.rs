use super::*;

/// Tests that non-admins must name a project.
///
/// Expected: Err(AppError::BadRequest)
#[tokio::test]
async fn project_required_for_non_admin() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let caller = domain(factory::create_user(db).await?);

    let result = TaskService::new(db, &hub)
        .list_by_project(Some("null".to_string()), &caller, first_page())
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests listing every task as admin without a project.
///
/// Expected: tasks of all projects and personal tasks
#[tokio::test]
async fn admin_lists_all_tasks() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let admin = factory::user::create_user_with_role(db, "admin").await?;
    let creator = factory::create_user(db).await?;
    let project = factory::create_project(db, creator.id).await?;
    factory::task::TaskFactory::new(db, creator.id)
        .project(project.id)
        .build()
        .await?;
    factory::create_task(db, creator.id).await?;

    let tasks = TaskService::new(db, &hub)
        .list_by_project(None, &domain(admin), first_page())
        .await?;

    assert_eq!(tasks.total, 2);

    Ok(())
}

/// Tests the personal task listing of a regular user.
///
/// Expected: only tasks outside projects that the user created or is assigned to
#[tokio::test]
async fn involving_lists_personal_tasks() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let user = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;
    let project = factory::create_project(db, user.id).await?;
    let own = factory::create_task(db, user.id).await?;
    let assigned = factory::task::TaskFactory::new(db, other.id)
        .assigned_to(user.id)
        .build()
        .await?;
    factory::task::TaskFactory::new(db, user.id)
        .project(project.id)
        .build()
        .await?;
    factory::create_task(db, other.id).await?;

    let tasks = TaskService::new(db, &hub)
        .list_involving(&user.uuid, None, None, first_page())
        .await?;

    let mut ids: Vec<&str> = tasks.items.iter().map(|t| t.id.as_str()).collect();
    ids.sort();
    let mut expected = vec![own.uuid.as_str(), assigned.uuid.as_str()];
    expected.sort();
    assert_eq!(ids, expected);

    Ok(())
}

/// Tests listing tasks assigned to a user who has none.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn assigned_to_without_tasks_is_not_found() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let user = factory::create_user(db).await?;

    let result = TaskService::new(db, &hub)
        .list_assigned_to(&user.uuid, first_page())
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
