pub mod resource;
pub mod users;

pub use resource::{ListQuery, Message};
