//! PostgreSQL persistence adapters built on Diesel.

mod diesel_login_service;
mod diesel_volunteer_repository;
mod models;
mod pool;
pub mod schema;

pub use diesel_login_service::{DieselLoginService, password_digest};
pub use diesel_volunteer_repository::DieselVolunteerRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
