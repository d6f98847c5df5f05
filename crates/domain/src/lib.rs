mod shared;
mod user;

pub use shared::entity::Entity;
pub use user::{InvalidUserType, User, UserType};
