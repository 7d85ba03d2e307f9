pub mod card;
pub mod config;
pub mod dashboard;
pub mod discovery;
pub mod draft;
pub mod models;
pub mod profile;
pub mod seed;
pub mod service;
pub mod store;
pub mod voting;
