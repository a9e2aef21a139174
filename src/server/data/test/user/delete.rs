use super::*;

/// Tests deleting a user with owned and assigned data.
///
/// Verifies that owned projects, created tasks, comments, memberships and
/// notifications are removed, while tasks created by others but assigned to
/// the user survive unassigned.
///
/// Expected: Ok(Some(User)) and dependent rows cleaned up
#[tokio::test]
async fn deletes_user_and_owned_records() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let doomed = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;

    let owned_project = factory::create_project(db, doomed.id).await?;
    factory::add_member(db, owned_project.id, other.id).await?;
    let other_project = factory::create_project(db, other.id).await?;
    factory::add_member(db, other_project.id, doomed.id).await?;

    let in_owned_project = factory::task::TaskFactory::new(db, other.id)
        .project(owned_project.id)
        .build()
        .await?;
    factory::create_comment(db, in_owned_project.id, other.id).await?;
    factory::create_task(db, doomed.id).await?;
    let assigned = factory::task::TaskFactory::new(db, other.id)
        .assigned_to(doomed.id)
        .build()
        .await?;
    factory::create_comment(db, assigned.id, doomed.id).await?;
    factory::create_notification(db, doomed.id).await?;

    let repo = UserRepository::new(db);
    let deleted = repo.delete(&doomed.uuid).await?;
    assert_eq!(deleted.map(|u| u.id), Some(doomed.uuid.clone()));

    assert_eq!(entity::prelude::User::find().count(db).await?, 1);
    assert_eq!(entity::prelude::Project::find().count(db).await?, 1);
    assert_eq!(entity::prelude::ProjectMember::find().count(db).await?, 0);
    assert_eq!(entity::prelude::Comment::find().count(db).await?, 0);
    assert_eq!(entity::prelude::Notification::find().count(db).await?, 0);

    let tasks = entity::prelude::Task::find().all(db).await?;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, assigned.id);
    assert_eq!(tasks[0].assigned_to_id, None);

    Ok(())
}

/// Tests deleting an unknown user.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_user() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    assert!(repo.delete("missing").await?.is_none());

    Ok(())
}
