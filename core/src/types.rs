//! Payload DTOs returned by the operadoras backend.
//!
//! # Design
//! These types mirror the mock-server's responses but are defined
//! independently; integration tests catch schema drift. Unknown fields are
//! ignored and nullable columns are `Option`, so additive backend changes
//! do not break parsing.

use serde::{Deserialize, Serialize};

/// Pagination parameters for the operadoras listing. Passed through to the
/// backend verbatim; bounds are the backend's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub const DEFAULT_PAGE: u32 = 1;
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PAGE, Self::DEFAULT_LIMIT)
    }
}

/// One row of the operadoras listing: an operadora with its summed expenses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperadoraResumo {
    pub cnpj: String,
    #[serde(default)]
    pub razao_social: Option<String>,
    #[serde(default)]
    pub valor_total: Option<f64>,
}

/// A page of the operadoras listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperadorasPage {
    pub data: Vec<OperadoraResumo>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Registry data of a single operadora. Operadoras known only from expense
/// records come back with the registry fields set to null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operadora {
    #[serde(default)]
    pub registro_ans: Option<String>,
    pub cnpj: String,
    #[serde(default)]
    pub razao_social: Option<String>,
    #[serde(default)]
    pub modalidade: Option<String>,
    #[serde(default)]
    pub uf: Option<String>,
}

/// Expenses of an operadora in one quarter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Despesa {
    pub trimestre: u8,
    pub ano: u16,
    pub valor_despesas: f64,
}

/// Quarterly expense history of an operadora, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DespesasOperadora {
    pub data: Vec<Despesa>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopOperadora {
    #[serde(default)]
    pub razao_social: Option<String>,
    #[serde(default)]
    pub uf: Option<String>,
    pub valor_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DespesasPorUf {
    pub uf: String,
    pub total: f64,
}

/// Aggregate expense statistics across all operadoras.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estatisticas {
    pub total_despesas: f64,
    pub media_despesas: f64,
    pub top_5_operadoras: Vec<TopOperadora>,
    pub despesas_por_uf: Vec<DespesasPorUf>,
}
