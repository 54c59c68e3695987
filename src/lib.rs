// Library exports for the Foodle client
// This allows integration tests and external code to use client modules

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod notify;
pub mod pages;
