mod mood;
mod quote;
mod routine;
mod user;

pub use mood::*;
pub use quote::*;
pub use routine::*;
pub use user::*;
