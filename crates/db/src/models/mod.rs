pub mod comment;
pub mod garden;
pub mod maintenance;
pub mod plant;
pub mod planting;
pub mod schedule;
pub mod user;
