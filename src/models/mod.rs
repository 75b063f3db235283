//! Database models and DTOs for all gym entities.

pub mod announcement;
pub mod attendance;
pub mod class;
pub mod pagination;
pub mod payment;
pub mod plan;
pub mod trainer;
pub mod user;
