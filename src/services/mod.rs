//! Business logic services.

pub mod announcement;
pub mod attendance;
pub mod auth;
pub mod class;
pub mod dashboard;
pub mod member;
pub mod payment;
pub mod plan;
pub mod trainer;
