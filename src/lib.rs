pub mod app;
pub mod domain;
pub mod repo;
pub mod usecase;
pub mod web;

pub use app::{AppState, BoxedRepo};
