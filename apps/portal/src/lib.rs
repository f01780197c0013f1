pub mod config;
pub mod errors;
pub mod forms;
pub mod gateway;
pub mod models;
pub mod pages;
pub mod selector;
pub mod session;
pub mod shell;
