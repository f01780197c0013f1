pub mod auth;
pub mod job;
pub mod notification;
pub mod profile;
pub mod skill;
pub mod user;
