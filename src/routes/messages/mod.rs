mod create_message;
mod get_messages;

pub use create_message::create_message;
pub use get_messages::get_messages;
