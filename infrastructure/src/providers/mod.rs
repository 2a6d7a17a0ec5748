//! Model provider adapters
//!
//! [`HttpChatGateway`] speaks the chat-completions wire format most
//! hosted providers expose. [`FallbackGateway`] chains two gateways,
//! switching to the secondary on transport-class failures only.

mod fallback;
mod http;

pub use fallback::FallbackGateway;
pub use http::HttpChatGateway;
