pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod courses;
pub mod error;
pub mod favorites;
pub mod form_result;
pub mod pages;
pub mod render;
pub mod show;
pub mod storage;
pub mod store;
pub mod text;
pub mod tvmaze;
