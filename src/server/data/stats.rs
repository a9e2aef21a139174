//! Aggregate counters for the dashboards.
//!
//! All counts are computed on demand; nothing here is cached or stored.

use chrono::{DateTime, Datelike, Duration, Month, NaiveDate, Utc};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};
use std::collections::HashMap;

use crate::{
    model::{project::ProjectStatus, task::TaskStatus, user::Role},
    server::{
        data::lookup,
        error::AppError,
        model::{
            page::{PageRequest, Paginated},
            stats::{MonthlyCounts, ProjectTaskStats, RecentActivity, Statistics, UserStats},
        },
    },
};

/// Number of calendar months covered by the statistics history.
const HISTORY_MONTHS: i32 = 7;
/// Window for counting new team members.
const RECENT_DAYS: i64 = 7;

pub struct StatsRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> StatsRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Computes totals and the monthly history ending with the month of `now`.
    ///
    /// # Arguments
    /// - `now` - Reference time; its UTC month is the last entry of the history
    ///
    /// # Returns
    /// - `Ok(Statistics)` - Totals with labels and counts ordered oldest first
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn statistics(&self, now: DateTime<Utc>) -> Result<Statistics, AppError> {
        let total_tasks = entity::prelude::Task::find().count(self.db).await?;
        let completed_tasks = self.count_tasks(TaskStatus::Completed, None).await?;
        let pending_tasks = self.count_tasks(TaskStatus::Pending, None).await?;
        let total_projects = entity::prelude::Project::find().count(self.db).await?;
        let ongoing_projects = self.count_active_projects(None).await?;
        let team_members = self.member_ids().await?.len() as u64;

        let mut labels = Vec::with_capacity(HISTORY_MONTHS as usize);
        let mut months = Vec::with_capacity(HISTORY_MONTHS as usize);
        for (start, end) in month_ranges(now) {
            let name = u8::try_from(start.month())
                .ok()
                .and_then(|m| Month::try_from(m).ok())
                .map(|m| m.name().to_string())
                .unwrap_or_default();
            labels.push(name);

            let range = Some((start, end));
            months.push(MonthlyCounts {
                completed_tasks: self.count_tasks(TaskStatus::Completed, range).await?,
                pending_tasks: self.count_tasks(TaskStatus::Pending, range).await?,
                ongoing_projects: self.count_active_projects(range).await?,
            });
        }

        Ok(Statistics {
            total_tasks,
            completed_tasks,
            pending_tasks,
            total_projects,
            ongoing_projects,
            team_members,
            labels,
            months,
        })
    }

    /// Counts open and completed work plus team members who joined recently.
    ///
    /// New team members are manager or user accounts created in the last seven days
    /// that belong to at least one project.
    pub async fn recent_activity(&self, now: DateTime<Utc>) -> Result<RecentActivity, AppError> {
        let new_tasks = entity::prelude::Task::find()
            .filter(entity::task::Column::Status.ne(TaskStatus::Completed.as_ref()))
            .count(self.db)
            .await?;
        let completed_tasks = self.count_tasks(TaskStatus::Completed, None).await?;
        let ongoing_projects = self.count_active_projects(None).await?;

        let member_ids = self.member_ids().await?;
        let new_team_members = if member_ids.is_empty() {
            0
        } else {
            entity::prelude::User::find()
                .filter(entity::user::Column::Id.is_in(member_ids))
                .filter(
                    entity::user::Column::Role
                        .is_in([Role::Manager.as_ref(), Role::User.as_ref()]),
                )
                .filter(entity::user::Column::CreatedAt.gte(now - Duration::days(RECENT_DAYS)))
                .count(self.db)
                .await?
        };

        Ok(RecentActivity {
            new_tasks,
            completed_tasks,
            ongoing_projects,
            new_team_members,
        })
    }

    /// Gets a page of per-project task counters, ordered by project name.
    pub async fn project_task_stats(
        &self,
        page: PageRequest,
    ) -> Result<Paginated<ProjectTaskStats>, AppError> {
        let total = entity::prelude::Project::find().count(self.db).await?;
        let projects = entity::prelude::Project::find()
            .order_by_asc(entity::project::Column::Name)
            .order_by_asc(entity::project::Column::Id)
            .offset(page.offset())
            .limit(page.limit)
            .all(self.db)
            .await?;

        let project_ids: Vec<i32> = projects.iter().map(|p| p.id).collect();
        let rows: Vec<(Option<i32>, String)> = if project_ids.is_empty() {
            Vec::new()
        } else {
            entity::prelude::Task::find()
                .select_only()
                .column(entity::task::Column::ProjectId)
                .column(entity::task::Column::Status)
                .filter(entity::task::Column::ProjectId.is_in(project_ids))
                .into_tuple()
                .all(self.db)
                .await?
        };

        // project key -> (open, completed)
        let mut counts: HashMap<i32, (u64, u64)> = HashMap::new();
        for (project_id, status) in rows {
            let Some(project_id) = project_id else {
                continue;
            };
            let entry = counts.entry(project_id).or_default();
            if status == TaskStatus::Completed.as_ref() {
                entry.1 += 1;
            } else {
                entry.0 += 1;
            }
        }

        let stats = projects
            .into_iter()
            .map(|project| {
                let (new_tasks, completed_tasks) =
                    counts.get(&project.id).copied().unwrap_or_default();
                ProjectTaskStats {
                    project_name: project.name,
                    project_id: project.uuid,
                    new_tasks,
                    completed_tasks,
                }
            })
            .collect();

        Ok(Paginated::new(stats, total, page))
    }

    /// Counts the activity of one user.
    ///
    /// # Returns
    /// - `Ok(Some(UserStats))` - Counters for the user
    /// - `Ok(None)` - No user with that id
    /// - `Err(AppError::DbErr)` - Database error
    pub async fn user_stats(&self, user: &str) -> Result<Option<UserStats>, AppError> {
        let Some(user_id) = lookup::user_id(self.db, user).await? else {
            return Ok(None);
        };

        let tasks = entity::prelude::Task::find()
            .filter(
                Condition::any()
                    .add(entity::task::Column::AssignedToId.eq(user_id))
                    .add(entity::task::Column::CreatedById.eq(user_id)),
            )
            .count(self.db)
            .await?;
        let comments = entity::prelude::Comment::find()
            .filter(entity::comment::Column::AuthorId.eq(user_id))
            .count(self.db)
            .await?;
        let updates = entity::prelude::Notification::find()
            .filter(entity::notification::Column::UserId.eq(user_id))
            .count(self.db)
            .await?;

        let member_of: Vec<i32> = entity::prelude::ProjectMember::find()
            .select_only()
            .column(entity::project_member::Column::ProjectId)
            .filter(entity::project_member::Column::UserId.eq(user_id))
            .into_tuple()
            .all(self.db)
            .await?;
        let projects = entity::prelude::Project::find()
            .filter(
                Condition::any()
                    .add(entity::project::Column::CreatedById.eq(user_id))
                    .add(entity::project::Column::Id.is_in(member_of)),
            )
            .count(self.db)
            .await?;

        Ok(Some(UserStats {
            tasks,
            comments,
            updates,
            projects,
        }))
    }

    async fn count_tasks(
        &self,
        status: TaskStatus,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<u64, AppError> {
        let mut query = entity::prelude::Task::find()
            .filter(entity::task::Column::Status.eq(status.as_ref()));
        if let Some((start, end)) = range {
            query = query
                .filter(entity::task::Column::CreatedAt.gte(start))
                .filter(entity::task::Column::CreatedAt.lt(end));
        }

        Ok(query.count(self.db).await?)
    }

    async fn count_active_projects(
        &self,
        range: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<u64, AppError> {
        let mut query = entity::prelude::Project::find()
            .filter(entity::project::Column::Status.eq(ProjectStatus::Active.as_ref()));
        if let Some((start, end)) = range {
            query = query
                .filter(entity::project::Column::CreatedAt.gte(start))
                .filter(entity::project::Column::CreatedAt.lt(end));
        }

        Ok(query.count(self.db).await?)
    }

    /// Distinct users that belong to at least one project.
    async fn member_ids(&self) -> Result<Vec<i32>, AppError> {
        Ok(entity::prelude::ProjectMember::find()
            .select_only()
            .column(entity::project_member::Column::UserId)
            .distinct()
            .into_tuple()
            .all(self.db)
            .await?)
    }
}

/// Start and exclusive end of each of the last months up to the month of `now`, oldest first.
fn month_ranges(now: DateTime<Utc>) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let first_of = |index: i32| {
        let year = index.div_euclid(12);
        let month = index.rem_euclid(12) as u32 + 1;
        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    };

    let current = now.year() * 12 + now.month0() as i32;
    (0..HISTORY_MONTHS)
        .rev()
        .filter_map(|back| {
            let index = current - back;
            Some((first_of(index)?, first_of(index + 1)?))
        })
        .collect()
}
