use super::*;

/// Tests the activity counters of one user.
///
/// Expected: tasks, comments, notifications and projects involving the user
#[tokio::test]
async fn counts_user_activity() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;

    factory::create_project(db, user.id).await?;
    let joined = factory::create_project(db, other.id).await?;
    factory::add_member(db, joined.id, user.id).await?;
    factory::create_project(db, other.id).await?;

    let own = factory::create_task(db, user.id).await?;
    factory::task::TaskFactory::new(db, other.id)
        .assigned_to(user.id)
        .build()
        .await?;
    factory::create_task(db, other.id).await?;

    factory::create_comment(db, own.id, user.id).await?;
    factory::create_comment(db, own.id, other.id).await?;
    factory::create_notification(db, user.id).await?;

    let repo = StatsRepository::new(db);
    let stats = repo.user_stats(&user.uuid).await?.unwrap();

    assert_eq!(stats.tasks, 2);
    assert_eq!(stats.comments, 1);
    assert_eq!(stats.updates, 1);
    assert_eq!(stats.projects, 2);

    assert!(repo.user_stats("missing").await?.is_none());

    Ok(())
}
