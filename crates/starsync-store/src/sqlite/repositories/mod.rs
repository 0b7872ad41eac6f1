//! Stateless repositories — every method takes `&Connection`.

pub mod body;
pub mod sync_state;
pub mod system;
