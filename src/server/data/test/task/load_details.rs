use super::*;

fn assert_send<T: Send>(_: &T) {}

/// Tests batch loading of task details for assigned and unassigned rows.
///
/// Expected: the loading future is `Send` so handlers can await it, input order is
/// kept and only assigned rows carry an assignee
#[tokio::test]
async fn loads_details_in_input_order() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let creator = factory::create_user(db).await?;
    let worker = factory::create_user(db).await?;
    let assigned = factory::task::TaskFactory::new(db, creator.id)
        .assigned_to(worker.id)
        .build()
        .await?;
    let unassigned = factory::create_task(db, creator.id).await?;

    let repo = TaskRepository::new(db);
    let loading = repo.load_details(vec![unassigned.clone(), assigned.clone()]);
    assert_send(&loading);
    let details = loading.await?;

    assert_eq!(details.len(), 2);
    assert_eq!(details[0].id, unassigned.uuid);
    assert!(details[0].assigned_to.is_none());
    assert_eq!(details[1].id, assigned.uuid);
    assert_eq!(details[1].assignee_id(), Some(worker.uuid.as_str()));
    assert_eq!(details[1].created_by.id, creator.uuid);

    Ok(())
}
