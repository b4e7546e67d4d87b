//! Domain types shared across the Farmbase workspace.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/`.

pub mod farm;
pub mod user;
