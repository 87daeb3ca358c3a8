//! Infrastructure layer: configuration, logging, the HTTP transport, request
//! pacing and HTML parsing.

pub mod config;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod parsing_error;
pub mod request_gate;

// Re-export commonly used items
pub use config::{LoggingConfig, ScraperConfig};
pub use http_client::{HttpClientConfig, Method, ReqwestTransport, Transport, TransportResponse};
pub use logging::{init_logging, init_logging_with_config};
pub use parsing::{ParsingError, ParsingResult, SelectorConfig};
pub use request_gate::RequestGate;
