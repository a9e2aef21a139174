//! Project service for business logic.
//!
//! Besides delegating to the `ProjectRepository`, this service keeps the project status
//! in line with the team size when the team is reassigned and tells users when they
//! join or leave a team.

use sea_orm::DatabaseConnection;

use crate::{
    model::project::ProjectStatus,
    server::{
        data::{project::ProjectRepository, user::UserRepository},
        error::AppError,
        model::{
            notification::CreateNotificationParams,
            page::{PageRequest, Paginated},
            project::{CreateProjectParams, Project, ProjectOverview, UpdateProjectParams},
            user::{MemberStats, User},
        },
        service::{notification::NotificationService, notifier::NotificationHub},
    },
};

pub struct ProjectService<'a> {
    db: &'a DatabaseConnection,
    hub: &'a NotificationHub,
}

impl<'a> ProjectService<'a> {
    pub fn new(db: &'a DatabaseConnection, hub: &'a NotificationHub) -> Self {
        Self { db, hub }
    }

    /// Creates a project and notifies its members.
    ///
    /// The status is `active` when members are given and `on-hold` otherwise. The
    /// creator is not notified about their own project.
    ///
    /// # Arguments
    /// - `name` - Project name
    /// - `description` - Optional description
    /// - `created_by` - External id of the creator
    /// - `team_members` - External ids of the members
    ///
    /// # Returns
    /// - `Ok(Project)` - The created project
    /// - `Err(AppError::BadRequest)` - Name or creator missing
    /// - `Err(AppError::NotFound)` - Creator or a member does not exist
    pub async fn create(
        &self,
        name: Option<String>,
        description: Option<String>,
        created_by: Option<String>,
        team_members: Vec<String>,
    ) -> Result<Project, AppError> {
        let name = name.ok_or_else(|| AppError::bad_request("Name is required"))?;
        let created_by =
            created_by.ok_or_else(|| AppError::bad_request("Project creator is required"))?;

        if UserRepository::new(self.db)
            .find_by_uuid(&created_by)
            .await?
            .is_none()
        {
            return Err(AppError::not_found("Project creator not found"));
        }

        let project = ProjectRepository::new(self.db)
            .create(CreateProjectParams {
                status: ProjectStatus::for_team_size(team_members.len()),
                name,
                description,
                created_by,
                team_members,
            })
            .await?;

        self.notify_team_change(&project, &[]).await?;

        tracing::info!("Created project {} ({})", project.name, project.id);

        Ok(project)
    }

    pub async fn get(&self, id: &str) -> Result<Project, AppError> {
        ProjectRepository::new(self.db)
            .find_by_uuid(id)
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))
    }

    /// Lists projects newest first. Admins see all projects, other users only the ones
    /// they are a member of.
    pub async fn list(
        &self,
        caller: &User,
        page: PageRequest,
    ) -> Result<Paginated<ProjectOverview>, AppError> {
        let member = (!caller.is_admin()).then_some(caller.id.as_str());

        ProjectRepository::new(self.db)
            .get_overview_paginated(member, page)
            .await
    }

    /// Gets the profiles of a project's members.
    pub async fn members(&self, id: &str) -> Result<Vec<User>, AppError> {
        ProjectRepository::new(self.db)
            .members(id)
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))
    }

    /// Gets the members of a project with their task counters.
    ///
    /// # Returns
    /// - `Err(AppError::NotFound)` - Unknown project, or a project without members
    pub async fn members_with_stats(&self, id: &str) -> Result<Vec<MemberStats>, AppError> {
        let members = ProjectRepository::new(self.db)
            .members_with_stats(id)
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))?;

        if members.is_empty() {
            return Err(AppError::not_found("No team members found"));
        }

        Ok(members)
    }

    /// Replaces the team of a project with the users holding `usernames`.
    ///
    /// The creator must stay on the team. The status becomes `active` or `on-hold`
    /// according to the new team size. Added and removed members are notified.
    ///
    /// # Returns
    /// - `Ok(Project)` - Updated project
    /// - `Err(AppError::NotFound)` - Unknown project or username
    /// - `Err(AppError::BadRequest)` - The creator is missing from the new team
    pub async fn assign_members(
        &self,
        id: &str,
        usernames: Vec<String>,
    ) -> Result<Project, AppError> {
        let before = self.get(id).await?;

        let mut unique = usernames;
        unique.sort();
        unique.dedup();

        let users = UserRepository::new(self.db)
            .find_by_usernames(&unique)
            .await?;
        if users.len() != unique.len() {
            return Err(AppError::not_found("One or more team members not found"));
        }
        if !users.iter().any(|user| user.id == before.created_by) {
            return Err(AppError::bad_request(
                "Creator cannot be removed from the project",
            ));
        }

        let team_members: Vec<String> = users.into_iter().map(|user| user.id).collect();
        let project = ProjectRepository::new(self.db)
            .update(
                id,
                UpdateProjectParams {
                    status: Some(ProjectStatus::for_team_size(team_members.len())),
                    team_members: Some(team_members),
                    ..Default::default()
                },
            )
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))?;

        self.notify_team_change(&project, &before.team_members)
            .await?;

        Ok(project)
    }

    /// Applies a partial update. A new team replaces the old one and the difference is
    /// notified.
    pub async fn update(&self, id: &str, params: UpdateProjectParams) -> Result<Project, AppError> {
        let before = self.get(id).await?;
        let team_changed = params.team_members.is_some();

        let project = ProjectRepository::new(self.db)
            .update(id, params)
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))?;

        if team_changed {
            self.notify_team_change(&project, &before.team_members)
                .await?;
        }

        Ok(project)
    }

    /// Deletes a project together with its tasks.
    pub async fn delete(&self, id: &str) -> Result<Project, AppError> {
        let project = ProjectRepository::new(self.db)
            .delete(id)
            .await?
            .ok_or_else(|| AppError::not_found("Project not found"))?;

        tracing::info!("Deleted project {} ({})", project.name, project.id);

        Ok(project)
    }

    /// Notifies members who joined or left compared to `before`. The creator is never
    /// told about joining.
    async fn notify_team_change(&self, project: &Project, before: &[String]) -> Result<(), AppError> {
        let notifications = NotificationService::new(self.db, self.hub);

        for member in &project.team_members {
            if member == &project.created_by || before.contains(member) {
                continue;
            }
            notifications
                .notify(CreateNotificationParams::info(
                    member,
                    format!("You have been added to a project ({})", project.name),
                ))
                .await?;
        }

        for member in before {
            if project.has_member(member) {
                continue;
            }
            notifications
                .notify(CreateNotificationParams::info(
                    member,
                    format!("You have been removed from a project ({})", project.name),
                ))
                .await?;
        }

        Ok(())
    }
}
