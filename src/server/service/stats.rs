//! Dashboard statistics service.

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::server::{
    data::stats::StatsRepository,
    error::AppError,
    model::{
        page::{PageRequest, Paginated},
        stats::{ProjectTaskStats, RecentActivity, Statistics, UserStats},
    },
};

pub struct StatsService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> StatsService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Totals plus the monthly history up to the current month.
    pub async fn statistics(&self) -> Result<Statistics, AppError> {
        StatsRepository::new(self.db).statistics(Utc::now()).await
    }

    pub async fn recent_activity(&self) -> Result<RecentActivity, AppError> {
        StatsRepository::new(self.db)
            .recent_activity(Utc::now())
            .await
    }

    /// Per-project task counters.
    ///
    /// # Returns
    /// - `Err(AppError::NotFound)` - No project on the requested page
    pub async fn project_task_stats(
        &self,
        page: PageRequest,
    ) -> Result<Paginated<ProjectTaskStats>, AppError> {
        let stats = StatsRepository::new(self.db)
            .project_task_stats(page)
            .await?;
        if stats.is_empty() {
            return Err(AppError::not_found("No projects found"));
        }

        Ok(stats)
    }

    /// Activity counters of the given user.
    pub async fn user_stats(&self, user: &str) -> Result<UserStats, AppError> {
        StatsRepository::new(self.db)
            .user_stats(user)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }
}
