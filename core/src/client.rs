//! Stateless HTTP request builder and response parser for the operadoras API.
//!
//! # Design
//! `OperadorasClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Whoever executes the round trip in between (a
//! `Transport`, a test, a C host) is free to do so however it likes.

use serde::de::DeserializeOwned;

use crate::encoding::encode_component;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{DespesasOperadora, Estatisticas, Operadora, OperadorasPage, Pagination};

const OPERADORAS_PATH: &str = "/api/operadoras";
const ESTATISTICAS_PATH: &str = "/api/estatisticas";

/// Synchronous, stateless client for the operadoras API.
#[derive(Debug, Clone)]
pub struct OperadorasClient {
    base_url: String,
}

impl OperadorasClient {
    /// An empty `base_url` produces same-origin relative URLs.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_operadoras(&self, pagination: Pagination) -> HttpRequest {
        self.get(format!(
            "{OPERADORAS_PATH}?page={}&limit={}",
            pagination.page, pagination.limit
        ))
    }

    pub fn build_get_operadora(&self, cnpj: &str) -> Result<HttpRequest, ApiError> {
        let segment = identifier_segment(cnpj)?;
        Ok(self.get(format!("{OPERADORAS_PATH}/{segment}")))
    }

    pub fn build_get_despesas(&self, cnpj: &str) -> Result<HttpRequest, ApiError> {
        let segment = identifier_segment(cnpj)?;
        Ok(self.get(format!("{OPERADORAS_PATH}/{segment}/despesas")))
    }

    pub fn build_get_estatisticas(&self) -> HttpRequest {
        self.get(ESTATISTICAS_PATH.to_string())
    }

    pub fn parse_list_operadoras(
        &self,
        response: HttpResponse,
    ) -> Result<OperadorasPage, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_operadora(&self, response: HttpResponse) -> Result<Operadora, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_despesas(
        &self,
        response: HttpResponse,
    ) -> Result<DespesasOperadora, ApiError> {
        parse_json(response)
    }

    pub fn parse_get_estatisticas(&self, response: HttpResponse) -> Result<Estatisticas, ApiError> {
        parse_json(response)
    }

    fn get(&self, path_and_query: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: format!("{}{path_and_query}", self.base_url),
            headers: vec![("accept".to_string(), "application/json".to_string())],
        }
    }
}

fn identifier_segment(cnpj: &str) -> Result<String, ApiError> {
    if cnpj.is_empty() {
        return Err(ApiError::InvalidIdentifier);
    }
    Ok(encode_component(cnpj))
}

/// Map non-2xx statuses to `ApiError::Http`, then deserialize the body.
fn parse_json<T: DeserializeOwned>(response: HttpResponse) -> Result<T, ApiError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
    })
}
