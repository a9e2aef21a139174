use super::*;

/// Tests editing the content of a comment.
///
/// Expected: Ok(Some(Comment)) with new content
#[tokio::test]
async fn updates_content() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let author = factory::create_user(db).await?;
    let task = factory::create_task(db, author.id).await?;
    let comment = factory::create_comment(db, task.id, author.id).await?;

    let repo = CommentRepository::new(db);
    let updated = repo
        .update_content(&comment.uuid, "Edited".to_string())
        .await?
        .unwrap();

    assert_eq!(updated.content, "Edited");
    assert!(updated.updated_at >= comment.updated_at);
    assert!(repo
        .update_content("missing", "Edited".to_string())
        .await?
        .is_none());

    Ok(())
}

/// Tests deleting a comment.
///
/// Expected: Ok(true) then Ok(false)
#[tokio::test]
async fn deletes_comment() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let author = factory::create_user(db).await?;
    let task = factory::create_task(db, author.id).await?;
    let comment = factory::create_comment(db, task.id, author.id).await?;

    let repo = CommentRepository::new(db);
    assert!(repo.delete(&comment.uuid).await?);
    assert!(!repo.delete(&comment.uuid).await?);
    assert!(repo.find_by_uuid(&comment.uuid).await?.is_none());

    Ok(())
}
