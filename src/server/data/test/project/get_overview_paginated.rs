use super::*;

/// Tests listing projects newest first with expanded users.
///
/// Expected: newest project first with creator and members resolved
#[tokio::test]
async fn lists_newest_first_with_users() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (creator, newest, members) = factory::helpers::create_project_with_members(db, 2).await?;
    factory::project::ProjectFactory::new(db, creator.id)
        .created_at(Utc::now() - Duration::days(3))
        .build()
        .await?;

    let repo = ProjectRepository::new(db);
    let page = repo
        .get_overview_paginated(None, PageRequest { page: 1, limit: 10 })
        .await?;

    assert_eq!(page.total, 2);
    let first = &page.items[0];
    assert_eq!(first.project.id, newest.uuid);
    assert_eq!(first.created_by.id, creator.uuid);
    let member_ids: Vec<&str> = first.team_members.iter().map(|u| u.id.as_str()).collect();
    assert_eq!(member_ids, vec![members[0].uuid.as_str(), members[1].uuid.as_str()]);
    assert!(page.items[1].team_members.is_empty());

    Ok(())
}

/// Tests restricting the listing to projects a user belongs to.
///
/// Expected: only the project with the membership
#[tokio::test]
async fn filters_by_member() -> Result<(), AppError> {
    let test = TestBuilder::new().with_all_tables().build().await.unwrap();
    let db = test.db.as_ref().unwrap();

    let (creator, project, members) = factory::helpers::create_project_with_members(db, 1).await?;
    factory::create_project(db, creator.id).await?;

    let repo = ProjectRepository::new(db);
    let page = repo
        .get_overview_paginated(Some(&members[0].uuid), PageRequest { page: 1, limit: 10 })
        .await?;

    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].project.id, project.uuid);

    let empty = repo
        .get_overview_paginated(Some("missing"), PageRequest { page: 1, limit: 10 })
        .await?;
    assert!(empty.is_empty());

    Ok(())
}
