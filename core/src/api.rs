//! Async facade over `OperadorasClient` and a `Transport`.
//!
//! # Design
//! Each operation builds its request, runs the blocking transport on the
//! tokio blocking pool and parses the response. The calling task is
//! suspended for the round trip while other tasks keep running. Failures
//! come back exactly as the transport or the parser produced them; there is
//! no retry and no cancellation.
//!
//! Must be awaited inside a tokio runtime.

use std::sync::Arc;

use crate::client::OperadorasClient;
use crate::config::{ClientConfig, ConfigError};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{DespesasOperadora, Estatisticas, Operadora, OperadorasPage, Pagination};

#[derive(Debug)]
pub struct OperadorasApi<T = UreqTransport> {
    client: OperadorasClient,
    transport: Arc<T>,
}

impl<T> Clone for OperadorasApi<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl OperadorasApi<UreqTransport> {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_transport(&config.base_url, UreqTransport::new(config))
    }

    /// Build from `OPERADORAS_API_URL` / `OPERADORAS_API_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::new(&ClientConfig::from_env()?))
    }
}

impl<T: Transport + 'static> OperadorasApi<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            client: OperadorasClient::new(base_url),
            transport: Arc::new(transport),
        }
    }

    pub fn client(&self) -> &OperadorasClient {
        &self.client
    }

    pub async fn list_operadoras(
        &self,
        pagination: Pagination,
    ) -> Result<OperadorasPage, ApiError> {
        let request = self.client.build_list_operadoras(pagination);
        let response = self.execute(request).await?;
        self.client.parse_list_operadoras(response)
    }

    pub async fn get_operadora(&self, cnpj: &str) -> Result<Operadora, ApiError> {
        let request = self.client.build_get_operadora(cnpj)?;
        let response = self.execute(request).await?;
        self.client.parse_get_operadora(response)
    }

    pub async fn get_despesas(&self, cnpj: &str) -> Result<DespesasOperadora, ApiError> {
        let request = self.client.build_get_despesas(cnpj)?;
        let response = self.execute(request).await?;
        self.client.parse_get_despesas(response)
    }

    pub async fn get_estatisticas(&self) -> Result<Estatisticas, ApiError> {
        let request = self.client.build_get_estatisticas();
        let response = self.execute(request).await?;
        self.client.parse_get_estatisticas(response)
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let transport = Arc::clone(&self.transport);
        tokio::task::spawn_blocking(move || transport.execute(request))
            .await
            .map_err(|e| ApiError::Network(format!("request task failed: {e}")))?
    }
}
