pub mod course;
pub mod error;
pub mod ownership;
pub mod payload;
pub mod repository;
pub mod user;
