use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;

const MAX_LIMIT: u32 = 100;
const TOP_N: usize = 5;

/// Registry row of an operadora.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operadora {
    pub registro_ans: Option<String>,
    pub cnpj: String,
    pub razao_social: Option<String>,
    pub modalidade: Option<String>,
    pub uf: Option<String>,
}

/// Consolidated expenses of one operadora in one quarter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DespesaRecord {
    pub cnpj: String,
    #[serde(default)]
    pub razao_social: Option<String>,
    pub trimestre: u8,
    pub ano: u16,
    pub valor_despesas: f64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub operadoras: Vec<Operadora>,
    #[serde(default)]
    pub despesas: Vec<DespesaRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperadoraResumo {
    pub cnpj: String,
    pub razao_social: Option<String>,
    pub valor_total: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OperadorasPage {
    pub data: Vec<OperadoraResumo>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Despesa {
    pub trimestre: u8,
    pub ano: u16,
    pub valor_despesas: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DespesasResponse {
    pub data: Vec<Despesa>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TopOperadora {
    pub razao_social: Option<String>,
    pub uf: Option<String>,
    pub valor_total: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DespesasPorUf {
    pub uf: String,
    pub total: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Estatisticas {
    pub total_despesas: f64,
    pub media_despesas: f64,
    pub top_5_operadoras: Vec<TopOperadora>,
    pub despesas_por_uf: Vec<DespesasPorUf>,
}

/// Raw query values; parsed by hand so bad input answers 422 like the
/// real backend instead of axum's 400.
#[derive(Deserialize)]
pub struct ListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

pub type Db = Arc<Dataset>;

/// Error answered with a FastAPI-style `{"detail": ...}` body.
#[derive(Debug)]
pub struct ApiFailure {
    status: StatusCode,
    detail: String,
}

impl ApiFailure {
    fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

impl Dataset {
    /// Small built-in dataset covering every lookup path: registry rows,
    /// an operadora known only from expenses, and one without UF.
    pub fn sample() -> Self {
        let operadora =
            |registro: &str, cnpj: &str, razao: &str, modalidade: &str, uf: &str| Operadora {
                registro_ans: Some(registro.to_string()),
                cnpj: cnpj.to_string(),
                razao_social: Some(razao.to_string()),
                modalidade: Some(modalidade.to_string()),
                uf: Some(uf.to_string()),
            };
        let despesa =
            |cnpj: &str, razao: &str, trimestre: u8, ano: u16, valor: f64| DespesaRecord {
                cnpj: cnpj.to_string(),
                razao_social: Some(razao.to_string()),
                trimestre,
                ano,
                valor_despesas: valor,
            };

        Self {
            operadoras: vec![
                operadora(
                    "326305",
                    "12345678000195",
                    "SAUDE VIDA LTDA",
                    "Medicina de Grupo",
                    "SP",
                ),
                operadora(
                    "359017",
                    "00112233000144",
                    "COOPERATIVA MEDICA UNIAO",
                    "Cooperativa Medica",
                    "MG",
                ),
                operadora(
                    "421545",
                    "98765432000110",
                    "ODONTO PLUS S.A.",
                    "Odontologia de Grupo",
                    "SP",
                ),
            ],
            despesas: vec![
                despesa("12345678000195", "SAUDE VIDA LTDA", 2, 2024, 1500.5),
                despesa("12345678000195", "SAUDE VIDA LTDA", 1, 2024, 1000.0),
                despesa("12345678000195", "SAUDE VIDA LTDA", 4, 2023, 750.25),
                despesa("00112233000144", "COOPERATIVA MEDICA UNIAO", 1, 2024, 2000.0),
                despesa("98765432000110", "ODONTO PLUS S.A.", 1, 2024, 125.5),
                despesa("55667788000199", "ASSISTENCIA AVULSA", 1, 2024, 50.0),
            ],
        }
    }

    fn registry_uf(&self, cnpj: &str) -> Option<String> {
        self.operadoras
            .iter()
            .find(|o| o.cnpj == cnpj)
            .and_then(|o| o.uf.clone())
    }

    /// Expenses summed per CNPJ, largest total first.
    fn totals(&self) -> Vec<OperadoraResumo> {
        let mut by_cnpj: BTreeMap<&str, OperadoraResumo> = BTreeMap::new();
        for d in &self.despesas {
            let entry = by_cnpj.entry(&d.cnpj).or_insert_with(|| OperadoraResumo {
                cnpj: d.cnpj.clone(),
                razao_social: None,
                valor_total: 0.0,
            });
            entry.valor_total += d.valor_despesas;
            // Keep the greatest name; `None` sorts below any present name.
            if entry.razao_social < d.razao_social {
                entry.razao_social = d.razao_social.clone();
            }
        }
        let mut totals: Vec<OperadoraResumo> = by_cnpj.into_values().collect();
        totals.sort_by(|a, b| b.valor_total.total_cmp(&a.valor_total));
        totals
    }

    pub fn page(&self, page: u32, limit: u32) -> OperadorasPage {
        let totals = self.totals();
        let total = totals.len() as u64;
        let offset = (page.saturating_sub(1) as usize).saturating_mul(limit as usize);
        let data = totals.into_iter().skip(offset).take(limit as usize).collect();
        OperadorasPage {
            data,
            total,
            page,
            limit,
        }
    }

    pub fn operadora(&self, cnpj: &str) -> Option<Operadora> {
        if let Some(found) = self.operadoras.iter().find(|o| o.cnpj == cnpj) {
            return Some(found.clone());
        }
        self.totals()
            .into_iter()
            .find(|t| t.cnpj == cnpj)
            .map(|t| Operadora {
                registro_ans: None,
                cnpj: t.cnpj,
                razao_social: t.razao_social,
                modalidade: None,
                uf: None,
            })
    }

    pub fn despesas(&self, cnpj: &str) -> Vec<Despesa> {
        let mut rows: Vec<Despesa> = self
            .despesas
            .iter()
            .filter(|d| d.cnpj == cnpj)
            .map(|d| Despesa {
                trimestre: d.trimestre,
                ano: d.ano,
                valor_despesas: d.valor_despesas,
            })
            .collect();
        rows.sort_by_key(|d| (d.ano, d.trimestre));
        rows
    }

    pub fn estatisticas(&self) -> Estatisticas {
        let aggregated: Vec<TopOperadora> = self
            .totals()
            .into_iter()
            .map(|t| TopOperadora {
                uf: self.registry_uf(&t.cnpj),
                razao_social: t.razao_social,
                valor_total: t.valor_total,
            })
            .collect();

        let total_despesas: f64 = aggregated.iter().map(|a| a.valor_total).sum();
        let media_despesas = if aggregated.is_empty() {
            0.0
        } else {
            total_despesas / aggregated.len() as f64
        };

        let mut por_uf: BTreeMap<String, f64> = BTreeMap::new();
        for a in &aggregated {
            if let Some(uf) = a.uf.as_deref().filter(|uf| !uf.is_empty()) {
                *por_uf.entry(uf.to_string()).or_default() += a.valor_total;
            }
        }
        let mut despesas_por_uf: Vec<DespesasPorUf> = por_uf
            .into_iter()
            .map(|(uf, total)| DespesasPorUf { uf, total })
            .collect();
        despesas_por_uf.sort_by(|a, b| b.total.total_cmp(&a.total));

        Estatisticas {
            total_despesas,
            media_despesas,
            top_5_operadoras: aggregated.into_iter().take(TOP_N).collect(),
            despesas_por_uf,
        }
    }
}

/// Reduce a path CNPJ to digits, left-padded with zeros to 14.
pub fn normalize_cnpj(raw: &str) -> String {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    format!("{digits:0>14}")
}

pub fn app() -> Router {
    app_with(Dataset::sample())
}

pub fn app_with(dataset: Dataset) -> Router {
    let db: Db = Arc::new(dataset);
    Router::new()
        .route("/api/operadoras", get(list_operadoras))
        .route("/api/operadoras/{cnpj}", get(get_operadora))
        .route("/api/operadoras/{cnpj}/despesas", get(get_despesas))
        .route("/api/estatisticas", get(get_estatisticas))
        .route("/health", get(health))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, Dataset::sample()).await
}

pub async fn run_with(listener: TcpListener, dataset: Dataset) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(dataset)).await
}

fn parse_bounded(
    name: &str,
    raw: Option<&str>,
    default: u32,
    max: Option<u32>,
) -> Result<u32, ApiFailure> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    let value: u32 = raw.trim().parse().map_err(|_| {
        ApiFailure::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("{name} must be a positive integer"),
        )
    })?;
    if value < 1 || max.is_some_and(|m| value > m) {
        let bound = match max {
            Some(m) => format!("between 1 and {m}"),
            None => "at least 1".to_string(),
        };
        return Err(ApiFailure::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("{name} must be {bound}"),
        ));
    }
    Ok(value)
}

async fn list_operadoras(
    State(db): State<Db>,
    Query(params): Query<ListParams>,
) -> Result<Json<OperadorasPage>, ApiFailure> {
    let page = parse_bounded("page", params.page.as_deref(), 1, None)?;
    let limit = parse_bounded("limit", params.limit.as_deref(), 10, Some(MAX_LIMIT))?;
    Ok(Json(db.page(page, limit)))
}

async fn get_operadora(
    State(db): State<Db>,
    Path(cnpj): Path<String>,
) -> Result<Json<Operadora>, ApiFailure> {
    db.operadora(&normalize_cnpj(&cnpj))
        .map(Json)
        .ok_or_else(|| ApiFailure::new(StatusCode::NOT_FOUND, "Operadora nao encontrada"))
}

async fn get_despesas(State(db): State<Db>, Path(cnpj): Path<String>) -> Json<DespesasResponse> {
    Json(DespesasResponse {
        data: db.despesas(&normalize_cnpj(&cnpj)),
    })
}

async fn get_estatisticas(State(db): State<Db>) -> Json<Estatisticas> {
    Json(db.estatisticas())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
