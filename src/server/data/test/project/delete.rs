use super::*;

/// Tests deleting a project with its tasks and comments.
///
/// Verifies that tasks of other projects are not touched.
///
/// Expected: Ok(Some(Project)) and only the unrelated task left
#[tokio::test]
async fn deletes_project_tasks_and_comments() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (creator, project, _members) = factory::helpers::create_project_with_members(db, 2).await?;
    let task = factory::task::TaskFactory::new(db, creator.id)
        .project(project.id)
        .build()
        .await?;
    factory::create_comment(db, task.id, creator.id).await?;
    let unrelated = factory::create_task(db, creator.id).await?;

    let repo = ProjectRepository::new(db);
    let deleted = repo.delete(&project.uuid).await?.unwrap();
    assert_eq!(deleted.id, project.uuid);

    assert_eq!(entity::prelude::Project::find().count(db).await?, 0);
    assert_eq!(entity::prelude::ProjectMember::find().count(db).await?, 0);
    assert_eq!(entity::prelude::Comment::find().count(db).await?, 0);
    let tasks = entity::prelude::Task::find().all(db).await?;
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, unrelated.id);

    assert!(repo.delete(&project.uuid).await?.is_none());

    Ok(())
}
