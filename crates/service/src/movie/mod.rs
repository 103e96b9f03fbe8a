//! Movie module: domain types, accessor traits, query builders and the service.

pub mod domain;
pub mod query;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::MovieCommentService;
