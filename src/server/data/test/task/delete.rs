use super::*;

/// Tests deleting a task with comments.
///
/// Expected: Ok(true), comments gone, second delete returns Ok(false)
#[tokio::test]
async fn deletes_task_and_comments() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let creator = factory::create_user(db).await?;
    let task = factory::create_task(db, creator.id).await?;
    factory::create_comment(db, task.id, creator.id).await?;
    factory::create_comment(db, task.id, creator.id).await?;

    let repo = TaskRepository::new(db);
    assert!(repo.delete(&task.uuid).await?);

    assert_eq!(entity::prelude::Task::find().count(db).await?, 0);
    assert_eq!(entity::prelude::Comment::find().count(db).await?, 0);
    assert!(!repo.delete(&task.uuid).await?);

    Ok(())
}
