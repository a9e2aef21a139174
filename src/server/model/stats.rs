//! Dashboard statistics models.

use crate::model::stats::{
    DatasetDto, ProjectTaskStatsDto, RecentActivityDto, StatValueDto, StatisticsDto, UserStatsDto,
};

/// Counts created within one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MonthlyCounts {
    pub completed_tasks: u64,
    pub pending_tasks: u64,
    pub ongoing_projects: u64,
}

/// Totals and monthly history for the main dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Statistics {
    pub total_tasks: u64,
    pub completed_tasks: u64,
    pub pending_tasks: u64,
    pub total_projects: u64,
    pub ongoing_projects: u64,
    pub team_members: u64,
    /// Month names, oldest first.
    pub labels: Vec<String>,
    /// Counts per month, aligned with `labels`.
    pub months: Vec<MonthlyCounts>,
}

/// Share of `part` in `whole` as a percentage with two decimals, `"0"` when `whole` is 0.
pub fn percent(part: u64, whole: u64) -> String {
    if whole == 0 {
        return "0".to_string();
    }
    format!("{:.2}", part as f64 / whole as f64 * 100.0)
}

impl Statistics {
    pub fn into_dto(self) -> StatisticsDto {
        let team_percent = if self.team_members > 0 { "100" } else { "0" };

        StatisticsDto {
            labels: self.labels,
            completed_tasks: StatValueDto {
                value: self.completed_tasks,
                percent: percent(self.completed_tasks, self.total_tasks),
            },
            pending_tasks: StatValueDto {
                value: self.pending_tasks,
                percent: percent(self.pending_tasks, self.total_tasks),
            },
            ongoing_projects: StatValueDto {
                value: self.ongoing_projects,
                percent: percent(self.ongoing_projects, self.total_projects),
            },
            team_members: StatValueDto {
                value: self.team_members,
                percent: team_percent.to_string(),
            },
            dataset: vec![
                DatasetDto {
                    label: "Completed Tasks".to_string(),
                    data: self.months.iter().map(|m| m.completed_tasks).collect(),
                },
                DatasetDto {
                    label: "Pending Tasks".to_string(),
                    data: self.months.iter().map(|m| m.pending_tasks).collect(),
                },
                DatasetDto {
                    label: "Ongoing Projects".to_string(),
                    data: self.months.iter().map(|m| m.ongoing_projects).collect(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentActivity {
    pub new_tasks: u64,
    pub completed_tasks: u64,
    pub ongoing_projects: u64,
    pub new_team_members: u64,
}

impl RecentActivity {
    pub fn into_dto(self) -> RecentActivityDto {
        RecentActivityDto {
            new_tasks: self.new_tasks,
            completed_tasks: self.completed_tasks,
            ongoing_projects: self.ongoing_projects,
            new_team_members: self.new_team_members,
        }
    }
}

/// Open and completed task counts of one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTaskStats {
    pub project_name: String,
    pub project_id: String,
    pub new_tasks: u64,
    pub completed_tasks: u64,
}

impl ProjectTaskStats {
    pub fn into_dto(self) -> ProjectTaskStatsDto {
        ProjectTaskStatsDto {
            proj_name: self.project_name,
            proj_id: self.project_id,
            new_tasks: self.new_tasks,
            completed_tasks: self.completed_tasks,
        }
    }
}

/// Activity counters of a single user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserStats {
    pub tasks: u64,
    pub comments: u64,
    /// Notifications received.
    pub updates: u64,
    pub projects: u64,
}

impl UserStats {
    pub fn into_dto(self) -> UserStatsDto {
        UserStatsDto {
            tasks: self.tasks,
            comments: self.comments,
            updates: self.updates,
            projects: self.projects,
        }
    }
}
