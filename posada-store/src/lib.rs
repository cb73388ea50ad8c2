pub mod app_config;
pub mod availability_repo;
pub mod booking_repo;
pub mod database;
pub mod memory;
pub mod photo_repo;
pub mod profile_repo;
pub mod redis_repo;

pub use database::DbClient;
pub use redis_repo::RedisClient;
