pub mod attendance;
pub mod auth;
pub mod department;
pub mod employee;
pub mod health;
pub mod meeting;
pub mod report;
pub mod task;
