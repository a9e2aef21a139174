use super::*;

/// Tests totals and the monthly history.
///
/// Verifies that the current month is the last entry of every dataset and
/// that team members are counted once across projects.
///
/// Expected: totals match seeded rows, history has seven months
#[tokio::test]
async fn counts_totals_and_current_month() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (creator, project, members) = factory::helpers::create_project_with_members(db, 2).await?;
    let second = factory::project::ProjectFactory::new(db, creator.id)
        .status("on-hold")
        .build()
        .await?;
    factory::add_member(db, second.id, members[0].id).await?;

    factory::task::TaskFactory::new(db, creator.id)
        .project(project.id)
        .status("completed")
        .build()
        .await?;
    factory::create_task(db, creator.id).await?;
    factory::create_task(db, creator.id).await?;
    factory::task::TaskFactory::new(db, creator.id)
        .status("in-progress")
        .build()
        .await?;

    let repo = StatsRepository::new(db);
    let stats = repo.statistics(Utc::now()).await?;

    assert_eq!(stats.total_tasks, 4);
    assert_eq!(stats.completed_tasks, 1);
    assert_eq!(stats.pending_tasks, 2);
    assert_eq!(stats.total_projects, 2);
    assert_eq!(stats.ongoing_projects, 1);
    assert_eq!(stats.team_members, 2);

    assert_eq!(stats.labels.len(), 7);
    assert_eq!(stats.months.len(), 7);
    let current = stats.months[6];
    assert_eq!(current.completed_tasks, 1);
    assert_eq!(current.pending_tasks, 2);
    assert_eq!(current.ongoing_projects, 1);

    let dto = stats.into_dto();
    assert_eq!(dto.completed_tasks.percent, "25.00");
    assert_eq!(dto.pending_tasks.percent, "50.00");
    assert_eq!(dto.ongoing_projects.percent, "50.00");
    assert_eq!(dto.team_members.percent, "100");

    Ok(())
}

/// Tests that rows older than the history window are left out of the months.
///
/// Expected: totals include the old task, monthly data does not
#[tokio::test]
async fn ignores_rows_outside_history() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let creator = factory::create_user(db).await?;
    factory::task::TaskFactory::new(db, creator.id)
        .created_at(Utc::now() - Duration::days(365))
        .build()
        .await?;

    let repo = StatsRepository::new(db);
    let stats = repo.statistics(Utc::now()).await?;

    assert_eq!(stats.pending_tasks, 1);
    assert!(stats.months.iter().all(|m| m.pending_tasks == 0));

    Ok(())
}
