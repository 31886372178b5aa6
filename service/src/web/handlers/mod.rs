// darkroom_service/src/web/handlers/mod.rs

pub mod draft_handlers;
pub mod order_handlers;
pub mod schedule_handlers;
