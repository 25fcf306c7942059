mod health_check;
pub mod messages;

pub use health_check::*;
