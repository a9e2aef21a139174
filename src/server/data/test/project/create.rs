use super::*;

/// Tests creating a project with team members.
///
/// Verifies that members are stored in the order given and duplicates are
/// collapsed into one membership.
///
/// Expected: Ok(Project) with two members
#[tokio::test]
async fn creates_project_with_members() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let creator = factory::create_user(db).await?;
    let first = factory::create_user(db).await?;
    let second = factory::create_user(db).await?;

    let repo = ProjectRepository::new(db);
    let project = repo
        .create(CreateProjectParams {
            name: "Apollo".to_string(),
            description: Some("Moonshot".to_string()),
            status: ProjectStatus::Active,
            created_by: creator.uuid.clone(),
            team_members: vec![second.uuid.clone(), first.uuid.clone(), second.uuid.clone()],
        })
        .await?;

    assert_eq!(project.name, "Apollo");
    assert_eq!(project.created_by, creator.uuid);
    assert_eq!(project.team_members, vec![second.uuid.clone(), first.uuid.clone()]);
    assert!(project.has_member(&first.uuid));
    assert!(!project.has_member(&creator.uuid));
    assert_eq!(entity::prelude::ProjectMember::find().count(db).await?, 2);

    Ok(())
}

/// Tests creating a project with an unknown member.
///
/// Expected: Err(AppError::NotFound) and nothing stored
#[tokio::test]
async fn fails_for_unknown_member() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let creator = factory::create_user(db).await?;

    let repo = ProjectRepository::new(db);
    let result = repo
        .create(CreateProjectParams {
            name: "Ghost".to_string(),
            description: None,
            status: ProjectStatus::OnHold,
            created_by: creator.uuid.clone(),
            team_members: vec!["missing".to_string()],
        })
        .await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(entity::prelude::Project::find().count(db).await?, 0);

    Ok(())
}
