//! Project data repository.
//!
//! Handles projects and their team membership rows. Projects are returned with creator
//! and members already translated to external ids, or expanded to users for listings.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use std::collections::HashMap;

use crate::{
    model::task::TaskStatus,
    server::{
        data::lookup,
        error::{internal::InternalError, AppError},
        model::{
            page::{PageRequest, Paginated},
            project::{CreateProjectParams, Project, ProjectOverview, UpdateProjectParams},
            user::{MemberStats, User},
        },
    },
};

pub struct ProjectRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProjectRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a project with its initial team.
    ///
    /// # Arguments
    /// - `params` - Project fields with creator and members as external ids
    ///
    /// # Returns
    /// - `Ok(Project)` - The created project
    /// - `Err(AppError::NotFound)` - Creator or a member does not exist
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn create(&self, params: CreateProjectParams) -> Result<Project, AppError> {
        let created_by_id = lookup::require_user_id(self.db, &params.created_by).await?;
        let member_ids = self.resolve_members(&params.team_members).await?;
        let now = Utc::now();

        let entity = entity::project::ActiveModel {
            uuid: ActiveValue::Set(uuid::Uuid::new_v4().to_string()),
            name: ActiveValue::Set(params.name),
            description: ActiveValue::Set(params.description),
            status: ActiveValue::Set(params.status.to_string()),
            created_by_id: ActiveValue::Set(created_by_id),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(self.db)
        .await?;

        let project_id = entity.id;
        self.insert_members(project_id, &member_ids).await?;

        self.load(vec![entity]).await?.pop().ok_or_else(|| {
            InternalError::DanglingReference {
                column: "project.id",
                id: project_id,
            }
            .into()
        })
    }

    /// Finds a project by external id.
    pub async fn find_by_uuid(&self, uuid: &str) -> Result<Option<Project>, AppError> {
        let Some(entity) = self.find_entity(uuid).await? else {
            return Ok(None);
        };

        let mut projects = self.load(vec![entity]).await?;

        Ok(projects.pop())
    }

    /// Gets a page of projects, newest first, with creator and members expanded.
    ///
    /// # Arguments
    /// - `member` - Restrict to projects this user (external id) is a member of
    /// - `page` - Requested page
    pub async fn get_overview_paginated(
        &self,
        member: Option<&str>,
        page: PageRequest,
    ) -> Result<Paginated<ProjectOverview>, AppError> {
        let mut query = entity::prelude::Project::find();

        if let Some(member) = member {
            let Some(user_id) = lookup::user_id(self.db, member).await? else {
                return Ok(Paginated::new(Vec::new(), 0, page));
            };

            let project_ids: Vec<i32> = entity::prelude::ProjectMember::find()
                .select_only()
                .column(entity::project_member::Column::ProjectId)
                .filter(entity::project_member::Column::UserId.eq(user_id))
                .into_tuple()
                .all(self.db)
                .await?;

            query = query.filter(entity::project::Column::Id.is_in(project_ids));
        }

        let total = query.clone().count(self.db).await?;
        let entities = query
            .order_by_desc(entity::project::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit)
            .all(self.db)
            .await?;

        let project_ids: Vec<i32> = entities.iter().map(|p| p.id).collect();
        let memberships = entity::prelude::ProjectMember::find()
            .filter(entity::project_member::Column::ProjectId.is_in(project_ids))
            .order_by_asc(entity::project_member::Column::Id)
            .all(self.db)
            .await?;

        let user_ids: Vec<i32> = entities
            .iter()
            .map(|p| p.created_by_id)
            .chain(memberships.iter().map(|m| m.user_id))
            .collect();
        let users = lookup::users_by_ids(self.db, user_ids).await?;

        let mut overviews = Vec::with_capacity(entities.len());
        for entity in entities {
            let created_by = users.get(&entity.created_by_id).cloned().ok_or(
                InternalError::DanglingReference {
                    column: "project.created_by_id",
                    id: entity.created_by_id,
                },
            )?;
            let team_members: Vec<User> = memberships
                .iter()
                .filter(|m| m.project_id == entity.id)
                .filter_map(|m| users.get(&m.user_id).cloned())
                .collect();
            let member_ids = team_members.iter().map(|u| u.id.clone()).collect();

            overviews.push(ProjectOverview {
                project: Project::from_entity(entity, created_by.id.clone(), member_ids)?,
                created_by,
                team_members,
            });
        }

        Ok(Paginated::new(overviews, total, page))
    }

    /// Gets the team members of a project, most recently registered first.
    ///
    /// # Returns
    /// - `Ok(Some(Vec<User>))` - Members of the project (possibly empty)
    /// - `Ok(None)` - No project with that id
    /// - `Err(AppError)` - Database error or invalid stored data
    pub async fn members(&self, uuid: &str) -> Result<Option<Vec<User>>, AppError> {
        let Some(project_id) = lookup::project_id(self.db, uuid).await? else {
            return Ok(None);
        };

        let member_ids: Vec<i32> = entity::prelude::ProjectMember::find()
            .select_only()
            .column(entity::project_member::Column::UserId)
            .filter(entity::project_member::Column::ProjectId.eq(project_id))
            .into_tuple()
            .all(self.db)
            .await?;

        let mut members: Vec<User> = lookup::users_by_ids(self.db, member_ids)
            .await?
            .into_values()
            .collect();
        members.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(Some(members))
    }

    /// Gets the team members of a project with counters over the tasks assigned to them.
    ///
    /// Counters include tasks of every project, not only this one.
    pub async fn members_with_stats(
        &self,
        uuid: &str,
    ) -> Result<Option<Vec<MemberStats>>, AppError> {
        let Some(members) = self.members(uuid).await? else {
            return Ok(None);
        };

        let ids = lookup::user_ids(
            self.db,
            &members.iter().map(|m| m.id.clone()).collect::<Vec<_>>(),
        )
        .await?;

        let assigned: Vec<(Option<i32>, String)> = entity::prelude::Task::find()
            .select_only()
            .column(entity::task::Column::AssignedToId)
            .column(entity::task::Column::Status)
            .filter(entity::task::Column::AssignedToId.is_in(ids.values().copied()))
            .into_tuple()
            .all(self.db)
            .await?;

        let mut counters: HashMap<i32, (u64, u64)> = HashMap::new();
        for (assignee, status) in assigned {
            let Some(assignee) = assignee else { continue };
            let entry = counters.entry(assignee).or_default();
            entry.0 += 1;
            if status == TaskStatus::Completed.as_ref() {
                entry.1 += 1;
            }
        }

        let stats = members
            .into_iter()
            .map(|user| {
                let (total_tasks, completed_tasks) = ids
                    .get(&user.id)
                    .and_then(|id| counters.get(id))
                    .copied()
                    .unwrap_or_default();

                MemberStats {
                    user,
                    total_tasks,
                    completed_tasks,
                }
            })
            .collect();

        Ok(Some(stats))
    }

    /// Applies a partial update. A `team_members` value replaces the whole team.
    ///
    /// # Returns
    /// - `Ok(Some(Project))` - Updated project
    /// - `Ok(None)` - No project with that id
    /// - `Err(AppError::NotFound)` - A new member does not exist
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn update(
        &self,
        uuid: &str,
        params: UpdateProjectParams,
    ) -> Result<Option<Project>, AppError> {
        let Some(entity) = self.find_entity(uuid).await? else {
            return Ok(None);
        };
        let project_id = entity.id;

        if let Some(team_members) = &params.team_members {
            let member_ids = self.resolve_members(team_members).await?;

            entity::prelude::ProjectMember::delete_many()
                .filter(entity::project_member::Column::ProjectId.eq(project_id))
                .exec(self.db)
                .await?;
            self.insert_members(project_id, &member_ids).await?;
        }

        let mut active = entity.into_active_model();
        if let Some(name) = params.name {
            active.name = ActiveValue::Set(name);
        }
        if let Some(description) = params.description {
            active.description = ActiveValue::Set(Some(description));
        }
        if let Some(status) = params.status {
            active.status = ActiveValue::Set(status.to_string());
        }
        active.updated_at = ActiveValue::Set(Utc::now());

        let updated = active.update(self.db).await?;
        let mut projects = self.load(vec![updated]).await?;

        Ok(projects.pop())
    }

    /// Deletes a project with its memberships, tasks and their comments.
    ///
    /// # Returns
    /// - `Ok(Some(Project))` - The deleted project
    /// - `Ok(None)` - No project with that id
    pub async fn delete(&self, uuid: &str) -> Result<Option<Project>, AppError> {
        let Some(entity) = self.find_entity(uuid).await? else {
            return Ok(None);
        };
        let project_id = entity.id;
        let project = self.load(vec![entity]).await?.pop();

        let task_ids: Vec<i32> = entity::prelude::Task::find()
            .select_only()
            .column(entity::task::Column::Id)
            .filter(entity::task::Column::ProjectId.eq(project_id))
            .into_tuple()
            .all(self.db)
            .await?;

        entity::prelude::Comment::delete_many()
            .filter(entity::comment::Column::TaskId.is_in(task_ids.clone()))
            .exec(self.db)
            .await?;
        entity::prelude::Task::delete_many()
            .filter(entity::task::Column::Id.is_in(task_ids))
            .exec(self.db)
            .await?;
        entity::prelude::ProjectMember::delete_many()
            .filter(entity::project_member::Column::ProjectId.eq(project_id))
            .exec(self.db)
            .await?;
        entity::prelude::Project::delete_by_id(project_id)
            .exec(self.db)
            .await?;

        Ok(project)
    }

    /// Builds domain projects from rows, resolving creators and members in batch.
    ///
    /// Used by other repositories that embed projects.
    pub async fn load(&self, entities: Vec<entity::project::Model>) -> Result<Vec<Project>, AppError> {
        let project_ids: Vec<i32> = entities.iter().map(|p| p.id).collect();
        let mut members = lookup::member_uuids(self.db, &project_ids).await?;
        let creator_ids: Vec<i32> = entities.iter().map(|p| p.created_by_id).collect();
        let creators = lookup::user_uuids(self.db, creator_ids).await?;

        let mut projects = Vec::with_capacity(entities.len());
        for entity in entities {
            let created_by = creators.get(&entity.created_by_id).cloned().ok_or(
                InternalError::DanglingReference {
                    column: "project.created_by_id",
                    id: entity.created_by_id,
                },
            )?;
            let team_members = members.remove(&entity.id).unwrap_or_default();

            projects.push(Project::from_entity(entity, created_by, team_members)?);
        }

        Ok(projects)
    }

    async fn find_entity(&self, uuid: &str) -> Result<Option<entity::project::Model>, AppError> {
        Ok(entity::prelude::Project::find()
            .filter(entity::project::Column::Uuid.eq(uuid))
            .one(self.db)
            .await?)
    }

    /// Resolves member external ids, failing when any of them is unknown.
    async fn resolve_members(&self, uuids: &[String]) -> Result<Vec<i32>, AppError> {
        let ids = lookup::user_ids(self.db, uuids).await?;

        uuids
            .iter()
            .map(|uuid| {
                ids.get(uuid)
                    .copied()
                    .ok_or_else(|| AppError::not_found("One or more team members not found"))
            })
            .collect()
    }

    async fn insert_members(&self, project_id: i32, user_ids: &[i32]) -> Result<(), AppError> {
        let mut seen = Vec::with_capacity(user_ids.len());
        for &user_id in user_ids {
            if seen.contains(&user_id) {
                continue;
            }
            seen.push(user_id);

            entity::project_member::ActiveModel {
                project_id: ActiveValue::Set(project_id),
                user_id: ActiveValue::Set(user_id),
                ..Default::default()
            }
            .insert(self.db)
            .await?;
        }

        Ok(())
    }
}
