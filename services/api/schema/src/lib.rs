//! sea-orm entities for the Farmbase relational schema.

pub mod farms;
pub mod samples;
pub mod users;
