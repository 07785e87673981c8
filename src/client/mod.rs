//! Transport layer
//!
//! Everything needed to carry a request to the Ironic API and bring the
//! response back, independent of which resource is being managed.
//!
//! # Module Structure
//!
//! - [`transport`] - The [`Transport`] trait, HTTP verbs and response type
//! - [`http`] - The real transport over `reqwest`
//! - [`fake`] - A fixture-driven transport that records calls, for tests
//! - [`error`] - Error type shared by transports and managers

pub mod error;
pub mod fake;
pub mod http;
pub mod transport;

pub use error::{format_error, Error, Result};
pub use fake::{Call, FakeTransport, Fixtures};
pub use http::HttpTransport;
pub use transport::{Headers, Method, Response, Transport};
