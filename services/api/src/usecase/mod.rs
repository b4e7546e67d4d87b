pub mod auth;
pub mod farm;
pub mod sample;
pub mod user;
