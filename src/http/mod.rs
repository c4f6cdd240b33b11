//! HTTP/1.x request handling.
//!
//! # Architecture
//!
//! - **`version`**: decodes the `HTTP/X.Y` protocol token
//! - **`headers`**: header section parser and the accumulating header map
//! - **`request`**: request, method and request-target types
//! - **`parser`**: turns a byte buffer into a [`request::Request`] or a [`parser::ParseError`]
//! - **`response`**: status codes and the canned responses
//! - **`writer`**: serializes and writes a response to the client
//! - **`connection`**: the per-connection state machine
//!
//! # Connection State Machine
//!
//! Every connection handles exactly one request:
//!
//! ```text
//!        ┌─────────────┐
//!        │   Reading   │ ← Read until blank line, size limit, EOF or deadline
//!        └──────┬──────┘
//!               │ (peer sent nothing → Closed)
//!               ▼
//!        ┌──────────────────┐
//!        │   Processing     │ ← Parse, pick 200 / 400 / 408 / 431
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │    Writing       │ ← Send response within the write deadline
//!        └──────┬───────────┘
//!               ▼
//!        ┌──────────────────┐
//!        │     Closed       │ ← Shut down and drop the stream
//!        └──────────────────┘
//! ```

pub mod connection;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod version;
pub mod writer;
