use super::*;

/// Tests listing a project's tasks by last update.
///
/// Expected: most recently updated task first, tasks of other projects excluded
#[tokio::test]
async fn orders_project_tasks_by_update() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let creator = factory::create_user(db).await?;
    let project = factory::create_project(db, creator.id).await?;
    let stale = factory::task::TaskFactory::new(db, creator.id)
        .project(project.id)
        .updated_at(Utc::now() - Duration::days(2))
        .build()
        .await?;
    let fresh = factory::task::TaskFactory::new(db, creator.id)
        .project(project.id)
        .created_at(Utc::now() - Duration::days(5))
        .build()
        .await?;
    factory::create_task(db, creator.id).await?;

    let repo = TaskRepository::new(db);
    let page = repo
        .get_paginated(
            &TaskFilter {
                project: Some(project.uuid.clone()),
                recently_updated_first: true,
                ..Default::default()
            },
            first_page(),
        )
        .await?;

    let ids: Vec<&str> = page.items.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids, vec![fresh.uuid.as_str(), stale.uuid.as_str()]);
    assert_eq!(page.total, 2);

    Ok(())
}

/// Tests the assigned and created filters.
///
/// Expected: each filter matches only its own task
#[tokio::test]
async fn filters_by_assignee_and_creator() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let creator = factory::create_user(db).await?;
    let worker = factory::create_user(db).await?;
    let assigned = factory::task::TaskFactory::new(db, creator.id)
        .assigned_to(worker.id)
        .build()
        .await?;
    let own = factory::create_task(db, worker.id).await?;

    let repo = TaskRepository::new(db);

    let by_assignee = repo
        .get_paginated(
            &TaskFilter {
                assigned_to: Some(worker.uuid.clone()),
                ..Default::default()
            },
            first_page(),
        )
        .await?;
    assert_eq!(by_assignee.items.len(), 1);
    assert_eq!(by_assignee.items[0].id, assigned.uuid);

    let by_creator = repo
        .get_paginated(
            &TaskFilter {
                created_by: Some(worker.uuid.clone()),
                ..Default::default()
            },
            first_page(),
        )
        .await?;
    assert_eq!(by_creator.items.len(), 1);
    assert_eq!(by_creator.items[0].id, own.uuid);

    let involving = repo
        .get_paginated(
            &TaskFilter {
                involving: Some(worker.uuid.clone()),
                ..Default::default()
            },
            first_page(),
        )
        .await?;
    assert_eq!(involving.total, 2);

    Ok(())
}

/// Tests title search, priority and the unattached filter together.
///
/// Expected: only the urgent unattached report
#[tokio::test]
async fn combines_search_priority_and_unattached() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let creator = factory::create_user(db).await?;
    let project = factory::create_project(db, creator.id).await?;
    let target = factory::task::TaskFactory::new(db, creator.id)
        .title("Monthly REPORT")
        .priority("urgent")
        .build()
        .await?;
    factory::task::TaskFactory::new(db, creator.id)
        .title("Report draft")
        .priority("low")
        .build()
        .await?;
    factory::task::TaskFactory::new(db, creator.id)
        .title("Project report")
        .priority("urgent")
        .project(project.id)
        .build()
        .await?;

    let repo = TaskRepository::new(db);
    let page = repo
        .get_paginated(
            &TaskFilter {
                search: Some("report".to_string()),
                priority: Some(TaskPriority::Urgent),
                without_project: true,
                ..Default::default()
            },
            first_page(),
        )
        .await?;

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, target.uuid);
    assert!(page.items[0].project.is_none());

    Ok(())
}

/// Tests filtering by a project that does not exist.
///
/// Expected: empty page
#[tokio::test]
async fn unknown_project_matches_nothing() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let creator = factory::create_user(db).await?;
    factory::create_task(db, creator.id).await?;

    let repo = TaskRepository::new(db);
    let page = repo
        .get_paginated(
            &TaskFilter {
                project: Some("missing".to_string()),
                ..Default::default()
            },
            first_page(),
        )
        .await?;

    assert!(page.is_empty());
    assert_eq!(page.total, 0);

    Ok(())
}

/// Tests that `%` in a search term is matched literally.
///
/// Expected: only the title containing "50%"
#[tokio::test]
async fn search_treats_percent_literally() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let creator = factory::create_user(db).await?;
    let target = factory::task::TaskFactory::new(db, creator.id)
        .title("Cut costs by 50%")
        .build()
        .await?;
    factory::task::TaskFactory::new(db, creator.id)
        .title("Ship 500 units")
        .build()
        .await?;

    let page = TaskRepository::new(db)
        .get_paginated(
            &TaskFilter {
                search: Some("50%".to_string()),
                ..Default::default()
            },
            first_page(),
        )
        .await?;

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, target.uuid);

    Ok(())
}
