use super::*;
use crate::{
    model::socket::ServerEvent,
    server::{model::page::PageRequest, service::notification::NotificationService},
};

mod access;

fn first_page() -> PageRequest {
    PageRequest { page: 1, limit: 10 }
}
