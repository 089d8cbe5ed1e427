// Public modules
pub mod chat;
pub mod confirmation;
pub mod error_detail;
pub mod health;
pub mod menu;
pub mod order;
pub mod session;

// Re-exports
pub use chat::{ChatRequest, ChatResponse};
pub use confirmation::OrderConfirmation;
pub use error_detail::ErrorDetail;
pub use health::HealthStatus;
pub use menu::{Menu, MenuItem};
pub use order::{Order, OrderItem};
pub use session::{SessionEnded, SessionId, SessionStart};
