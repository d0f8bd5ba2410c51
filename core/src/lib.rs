//! Data-access layer for the operadoras ANS backend.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). `OperadorasApi` pairs the
//! pure client with a blocking `Transport` and exposes the four backend
//! reads as async calls. Alongside it live the CNPJ display formatter and
//! the client-side route table used by the views.
//!
//! # Design
//! - `OperadorasClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and the FFI crate can hand it to a C host.
//! - Identifiers are percent-encoded into a single path segment.
//! - DTOs are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod api;
pub mod client;
pub mod cnpj;
pub mod config;
pub mod encoding;
pub mod error;
pub mod http;
pub mod routes;
pub mod transport;
pub mod types;

pub use api::OperadorasApi;
pub use client::OperadorasClient;
pub use cnpj::{digits_only, format_cnpj};
pub use config::{ClientConfig, ConfigError};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use routes::{RouteEntry, RouteMatch, RouteTable, View, ROUTES};
pub use transport::{Transport, UreqTransport};
pub use types::{
    Despesa, DespesasOperadora, DespesasPorUf, Estatisticas, Operadora, OperadoraResumo,
    OperadorasPage, Pagination, TopOperadora,
};
