use crate::{
    model::task::{TaskPriority, TaskStatus},
    server::{
        data::task::TaskRepository,
        error::AppError,
        model::{
            page::PageRequest,
            task::{CreateTaskParams, TaskFilter, UpdateTaskParams},
        },
    },
};
use chrono::{Duration, Utc};
use sea_orm::{EntityTrait, PaginatorTrait};
use test_utils::{builder::TestBuilder, factory};

mod create;
mod delete;
mod get_paginated;
mod load_details;
mod update;

fn first_page() -> PageRequest {
    PageRequest { page: 1, limit: 10 }
}
