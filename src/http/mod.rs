//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept loop, one task per connection)
//!     → handler.rs (connection state machine)
//!     → request.rs (read head line by line)
//!     → [routing layer resolves content]
//!     → response.rs (serialize, write, flush, close)
//! ```

pub mod context;
pub mod error;
pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use context::ServiceContext;
pub use error::HttpError;
pub use handler::{ConnectionHandler, Disposition, ERROR_BODY, NOT_FOUND_PAGE};
pub use request::{MalformedRequest, RequestHead};
pub use response::{ResponseBuilder, ResponseHead, TEXT_HTML};
pub use server::DecoyServer;
