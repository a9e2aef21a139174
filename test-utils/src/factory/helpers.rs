//! Shared helper utilities for factory methods.

use sea_orm::{DatabaseConnection, DbErr};

/// Counter for generating unique values in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Generates a fresh external identifier.
pub fn new_uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Creates a project owned by a new user with the given number of members.
///
/// The creator is not added as a member.
///
/// # Arguments
/// - `db` - Database connection
/// - `member_count` - Number of member users to create and attach
///
/// # Returns
/// - `Ok((creator, project, members))` - Created entities
/// - `Err(DbErr)` - Database error during creation
pub async fn create_project_with_members(
    db: &DatabaseConnection,
    member_count: usize,
) -> Result<
    (
        entity::user::Model,
        entity::project::Model,
        Vec<entity::user::Model>,
    ),
    DbErr,
> {
    let creator = crate::factory::user::create_user(db).await?;
    let project = crate::factory::project::create_project(db, creator.id).await?;

    let mut members = Vec::with_capacity(member_count);
    for _ in 0..member_count {
        let member = crate::factory::user::create_user(db).await?;
        crate::factory::project::add_member(db, project.id, member.id).await?;
        members.push(member);
    }

    Ok((creator, project, members))
}
