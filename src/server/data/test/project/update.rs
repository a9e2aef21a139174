use super::*;

/// Tests replacing the team and renaming a project.
///
/// Expected: old membership removed, new one stored, name changed
#[tokio::test]
async fn replaces_team_members() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (_creator, project, members) = factory::helpers::create_project_with_members(db, 1).await?;
    let newcomer = factory::create_user(db).await?;

    let repo = ProjectRepository::new(db);
    let updated = repo
        .update(
            &project.uuid,
            UpdateProjectParams {
                name: Some("Renamed".to_string()),
                team_members: Some(vec![newcomer.uuid.clone()]),
                ..Default::default()
            },
        )
        .await?
        .unwrap();

    assert_eq!(updated.name, "Renamed");
    assert_eq!(updated.team_members, vec![newcomer.uuid.clone()]);
    assert!(!updated.has_member(&members[0].uuid));

    Ok(())
}

/// Tests that omitted fields stay unchanged.
///
/// Expected: status changed, team kept
#[tokio::test]
async fn keeps_team_when_not_given() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (_creator, project, members) = factory::helpers::create_project_with_members(db, 2).await?;

    let repo = ProjectRepository::new(db);
    let updated = repo
        .update(
            &project.uuid,
            UpdateProjectParams {
                status: Some(ProjectStatus::Completed),
                ..Default::default()
            },
        )
        .await?
        .unwrap();

    assert_eq!(updated.status, ProjectStatus::Completed);
    assert_eq!(updated.team_members.len(), members.len());
    assert!(repo
        .update("missing", UpdateProjectParams::default())
        .await?
        .is_none());

    Ok(())
}
