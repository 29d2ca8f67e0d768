pub mod auth;
pub mod config;
pub mod controller;
pub mod events;
pub mod helpers;
pub mod models;
pub mod repositories;
