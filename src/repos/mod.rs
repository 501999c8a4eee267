pub mod booking_repo;
pub mod error;
pub mod user_repo;
