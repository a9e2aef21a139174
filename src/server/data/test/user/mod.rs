use crate::{
    model::user::{Gender, Role},
    server::{
        data::user::UserRepository,
        error::AppError,
        model::{
            page::PageRequest,
            user::{CreateUserParams, UpdateUserParams, UserFilter},
        },
    },
};
use chrono::{Duration, Utc};
use sea_orm::{EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory};

mod admin_exists;
mod create;
mod delete;
