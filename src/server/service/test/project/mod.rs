use super::*;
use crate::{
    model::project::ProjectStatus,
    server::{model::project::UpdateProjectParams, service::project::ProjectService},
};

mod assign_members;
