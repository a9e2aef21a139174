use super::*;
use crate::{
    model::task::{TaskPriority, TaskStatus},
    server::{
        model::{
            page::PageRequest,
            task::{NewTaskParams, UpdateTaskParams},
        },
        service::task::TaskService,
    },
};

mod comment;
mod create;
mod list;
mod update;

fn first_page() -> PageRequest {
    PageRequest { page: 1, limit: 10 }
}
