mod task;
mod user;
