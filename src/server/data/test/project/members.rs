use super::*;

/// Tests listing members most recently registered first.
///
/// Expected: younger account first
#[tokio::test]
async fn lists_newest_members_first() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let creator = factory::create_user(db).await?;
    let project = factory::create_project(db, creator.id).await?;
    let old = factory::user::UserFactory::new(db)
        .created_at(Utc::now() - Duration::days(10))
        .build()
        .await?;
    let young = factory::create_user(db).await?;
    factory::add_member(db, project.id, old.id).await?;
    factory::add_member(db, project.id, young.id).await?;

    let repo = ProjectRepository::new(db);
    let members = repo.members(&project.uuid).await?.unwrap();

    let ids: Vec<&str> = members.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(ids, vec![young.uuid.as_str(), old.uuid.as_str()]);
    assert!(repo.members("missing").await?.is_none());

    Ok(())
}

/// Tests member task counters.
///
/// Verifies that counters cover assigned tasks in any project.
///
/// Expected: 2 total and 1 completed for the busy member, zeros otherwise
#[tokio::test]
async fn counts_assigned_tasks() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (creator, project, members) = factory::helpers::create_project_with_members(db, 2).await?;
    let busy = &members[0];

    factory::task::TaskFactory::new(db, creator.id)
        .project(project.id)
        .assigned_to(busy.id)
        .status("completed")
        .build()
        .await?;
    factory::task::TaskFactory::new(db, creator.id)
        .assigned_to(busy.id)
        .build()
        .await?;

    let repo = ProjectRepository::new(db);
    let stats = repo.members_with_stats(&project.uuid).await?.unwrap();

    let busy_stats = stats.iter().find(|s| s.user.id == busy.uuid).unwrap();
    assert_eq!(busy_stats.total_tasks, 2);
    assert_eq!(busy_stats.completed_tasks, 1);

    let idle_stats = stats.iter().find(|s| s.user.id == members[1].uuid).unwrap();
    assert_eq!(idle_stats.total_tasks, 0);
    assert_eq!(idle_stats.completed_tasks, 0);

    Ok(())
}
