//! Typed client for the book endpoints of an admin CRUD backend.
//!
//! # Overview
//! Seven operations, one endpoint each. `BookApi` builds a
//! `RequestDescriptor` per call and forwards it to an injected `Dispatch`
//! implementation, returning whatever the dispatcher produces.
//!
//! # Design
//! - `BookClient` is stateless: `build_*` produces descriptors, `parse_*`
//!   decodes the backend's `{code, data, msg}` envelope.
//! - `Dispatch` is the seam for I/O. `ReqwestDispatcher` is the stock
//!   implementation; tests and hosts can provide their own.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::BookClient;
pub use config::ClientConfig;
pub use dispatch::{BookApi, Dispatch};
pub use error::ApiError;
pub use http::{HttpMethod, HttpResponse, RequestDescriptor};
pub use transport::ReqwestDispatcher;
pub use types::{ApiResponse, Book, BookId, BookIds, BookSearch, PageResult, PublicInfo};
