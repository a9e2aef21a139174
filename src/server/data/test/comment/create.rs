use super::*;

/// Tests adding a comment.
///
/// Expected: Ok(Comment) with task and author resolved
#[tokio::test]
async fn creates_comment() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let author = factory::create_user(db).await?;
    let task = factory::create_task(db, author.id).await?;

    let repo = CommentRepository::new(db);
    let comment = repo
        .create(&task.uuid, &author.uuid, "Looks good".to_string())
        .await?;

    assert_eq!(comment.content, "Looks good");
    assert_eq!(comment.task, task.uuid);
    assert_eq!(comment.author.id, author.uuid);
    assert_eq!(comment.author.email, author.email);

    let found = repo.find_by_uuid(&comment.id).await?.unwrap();
    assert_eq!(found.content, "Looks good");

    Ok(())
}

/// Tests adding a comment to an unknown task.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn fails_for_unknown_task() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let author = factory::create_user(db).await?;

    let repo = CommentRepository::new(db);
    let result = repo.create("missing", &author.uuid, "Hello".to_string()).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
