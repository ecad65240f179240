pub mod ai_handlers;
pub mod stub_handlers;
pub mod user_handlers;
