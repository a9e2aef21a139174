//! Project domain models and parameters.

use chrono::{DateTime, Utc};

use crate::{
    model::project::{ProjectDto, ProjectOverviewDto, ProjectStatus, UpdateProjectDto},
    server::{
        error::{internal::InternalError, AppError},
        model::user::User,
        util::parse,
    },
};

/// Project with creator and team members as external ids.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    /// External id of the creator.
    pub created_by: String,
    /// External ids of the team members.
    pub team_members: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    /// Converts an entity model to a project domain model at the repository boundary.
    ///
    /// # Arguments
    /// - `entity` - Project row
    /// - `created_by` - External id of the creator
    /// - `team_members` - External ids of the members
    ///
    /// # Returns
    /// - `Ok(Project)` - Converted project
    /// - `Err(InternalError::InvalidStoredValue)` - Stored status is unknown
    pub fn from_entity(
        entity: entity::project::Model,
        created_by: String,
        team_members: Vec<String>,
    ) -> Result<Self, InternalError> {
        Ok(Self {
            id: entity.uuid,
            name: entity.name,
            description: entity.description,
            status: parse::stored("project.status", &entity.status)?,
            created_by,
            team_members,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }

    pub fn has_member(&self, user_id: &str) -> bool {
        self.team_members.iter().any(|member| member == user_id)
    }

    pub fn into_dto(self) -> ProjectDto {
        ProjectDto {
            id: self.id,
            name: self.name,
            description: self.description,
            status: self.status,
            created_by: self.created_by,
            team_members: self.team_members,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Project listing entry with creator and members expanded.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectOverview {
    pub project: Project,
    pub created_by: User,
    pub team_members: Vec<User>,
}

impl ProjectOverview {
    pub fn into_dto(self) -> ProjectOverviewDto {
        ProjectOverviewDto {
            id: self.project.id,
            name: self.project.name,
            description: self.project.description,
            status: self.project.status,
            created_by: self.created_by.into_ref_dto(),
            team_members: self
                .team_members
                .into_iter()
                .map(User::into_ref_dto)
                .collect(),
            created_at: self.project.created_at,
            updated_at: self.project.updated_at,
        }
    }
}

/// Parameters for creating a project. Users are referenced by external id.
#[derive(Debug, Clone)]
pub struct CreateProjectParams {
    pub name: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub created_by: String,
    pub team_members: Vec<String>,
}

/// Parameters for updating a project. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateProjectParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    /// Replacement team as external user ids.
    pub team_members: Option<Vec<String>>,
}

impl UpdateProjectParams {
    /// Builds update parameters from a request body. Empty fields are ignored.
    ///
    /// # Returns
    /// - `Ok(UpdateProjectParams)` - Parsed parameters
    /// - `Err(AppError::BadRequest)` - Unknown status
    pub fn from_dto(dto: UpdateProjectDto) -> Result<Self, AppError> {
        Ok(Self {
            name: parse::present(dto.name),
            description: parse::present(dto.description),
            status: parse::variant(dto.status, "Invalid status")?,
            team_members: dto
                .team_members
                .map(|members| members.into_iter().map(|member| member.into_id()).collect()),
        })
    }
}
