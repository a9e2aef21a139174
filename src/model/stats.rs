use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A total with its share of the whole, formatted with two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StatValueDto {
    pub value: u64,
    pub percent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DatasetDto {
    pub label: String,
    pub data: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatisticsDto {
    pub labels: Vec<String>,
    pub completed_tasks: StatValueDto,
    pub pending_tasks: StatValueDto,
    pub ongoing_projects: StatValueDto,
    pub team_members: StatValueDto,
    pub dataset: Vec<DatasetDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentActivityDto {
    pub new_tasks: u64,
    pub completed_tasks: u64,
    pub ongoing_projects: u64,
    pub new_team_members: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectTaskStatsDto {
    pub proj_name: String,
    #[serde(rename = "projID")]
    pub proj_id: String,
    pub new_tasks: u64,
    pub completed_tasks: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserStatsDto {
    pub tasks: u64,
    pub comments: u64,
    pub updates: u64,
    pub projects: u64,
}
