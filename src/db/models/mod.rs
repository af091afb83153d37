mod reservation;
mod resource;
mod user;

pub use reservation::*;
pub use resource::*;
pub use user::*;
