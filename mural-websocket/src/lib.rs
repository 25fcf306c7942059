pub mod application;
pub mod messages;
mod server;
mod session;

pub use server::BroadcastServer;
pub use session::BroadcastSession;
