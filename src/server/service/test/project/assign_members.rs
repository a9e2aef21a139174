use super::*;

/// Tests replacing the team by usernames.
///
/// Expected: new member added and notified, removed member notified
#[tokio::test]
async fn replaces_team_and_notifies_changes() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let creator = factory::create_user(db).await?;
    let leaving = factory::create_user(db).await?;
    let joining = factory::create_user(db).await?;
    let project = factory::project::ProjectFactory::new(db, creator.id)
        .name("Apollo")
        .build()
        .await?;
    factory::add_member(db, project.id, creator.id).await?;
    factory::add_member(db, project.id, leaving.id).await?;

    let updated = ProjectService::new(db, &hub)
        .assign_members(
            &project.uuid,
            vec![creator.username.clone(), joining.username.clone()],
        )
        .await?;

    assert!(updated.has_member(&joining.uuid));
    assert!(!updated.has_member(&leaving.uuid));
    assert_eq!(updated.status, ProjectStatus::Active);
    assert_eq!(
        messages_for(db, joining.id).await?,
        vec!["You have been added to a project (Apollo)".to_string()]
    );
    assert_eq!(
        messages_for(db, leaving.id).await?,
        vec!["You have been removed from a project (Apollo)".to_string()]
    );

    Ok(())
}

/// Tests a team that leaves out the creator.
///
/// Expected: Err(AppError::BadRequest)
#[tokio::test]
async fn creator_must_stay() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let creator = factory::create_user(db).await?;
    let other = factory::create_user(db).await?;
    let project = factory::create_project(db, creator.id).await?;

    let result = ProjectService::new(db, &hub)
        .assign_members(&project.uuid, vec![other.username.clone()])
        .await;

    assert!(matches!(result, Err(AppError::BadRequest(_))));

    Ok(())
}

/// Tests a team naming an unknown username.
///
/// Expected: Err(AppError::NotFound)
#[tokio::test]
async fn fails_for_unknown_username() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();
    let hub = NotificationHub::new();

    let creator = factory::create_user(db).await?;
    let project = factory::create_project(db, creator.id).await?;

    let result = ProjectService::new(db, &hub)
        .assign_members(
            &project.uuid,
            vec![creator.username.clone(), "nobody".to_string()],
        )
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));

    Ok(())
}
