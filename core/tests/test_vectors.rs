//! Verify build/parse methods, the CNPJ formatter and the route table
//! against JSON test vectors stored in `test-vectors/`.
//!
//! Parsed results are compared as typed values, not raw strings, to avoid
//! false negatives from field ordering or number formatting.

use std::collections::BTreeMap;

use operadoras_core::{
    format_cnpj, ApiError, DespesasOperadora, Estatisticas, HttpMethod, HttpRequest, HttpResponse,
    Operadora, OperadorasClient, OperadorasPage, Pagination, RouteTable, View,
};
use serde_json::Value;

fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn check_outcome<T>(name: &str, case: &Value, result: Result<T, ApiError>)
where
    T: serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
{
    if let Some(expected_error) = case.get("expected_error") {
        let err = result.expect_err(name);
        let status = expected_error["status"].as_u64().unwrap() as u16;
        assert_eq!(err.status(), Some(status), "{name}: error status");
        match err {
            ApiError::Http { body, .. } => {
                let expected_body = case["simulated_response"]["body"].as_str().unwrap();
                assert_eq!(body, expected_body, "{name}: body");
            }
            other => panic!("{name}: unexpected error {other:?}"),
        }
    } else {
        let expected: T = serde_json::from_value(case["expected_result"].clone()).unwrap();
        assert_eq!(result.unwrap(), expected, "{name}: parsed result");
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let base_url = vectors["base_url"].as_str().unwrap();

    let c = OperadorasClient::new(base_url);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let cnpj = || input["cnpj"].as_str().unwrap();

        let req: HttpRequest = match case["operation"].as_str().unwrap() {
            "list_operadoras" => {
                let pagination: Pagination = serde_json::from_value(input.clone()).unwrap();
                c.build_list_operadoras(pagination)
            }
            "get_operadora" => c.build_get_operadora(cnpj()).unwrap(),
            "get_despesas" => c.build_get_despesas(cnpj()).unwrap(),
            "get_estatisticas" => c.build_get_estatisticas(),
            other => panic!("unknown operation: {other}"),
        };

        let expected_req = &case["expected_request"];
        let method = parse_method(expected_req["method"].as_str().unwrap());
        assert_eq!(req.method, method, "{name}: method");
        let path = expected_req["path"].as_str().unwrap();
        assert_eq!(req.url, format!("{base_url}{path}"), "{name}: url");

        let response = simulated(case);
        match case["operation"].as_str().unwrap() {
            "list_operadoras" => {
                check_outcome::<OperadorasPage>(name, case, c.parse_list_operadoras(response))
            }
            "get_operadora" => {
                check_outcome::<Operadora>(name, case, c.parse_get_operadora(response))
            }
            "get_despesas" => {
                check_outcome::<DespesasOperadora>(name, case, c.parse_get_despesas(response))
            }
            "get_estatisticas" => {
                check_outcome::<Estatisticas>(name, case, c.parse_get_estatisticas(response))
            }
            _ => unreachable!(),
        }
    }
}

// ---------------------------------------------------------------------------
// CNPJ formatting
// ---------------------------------------------------------------------------

#[test]
fn cnpj_test_vectors() {
    let raw = include_str!("../../test-vectors/cnpj.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let input = case["input"].as_str();
        let expected = case["expected"].as_str().unwrap();
        assert_eq!(format_cnpj(input), expected, "input: {input:?}");
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

fn parse_view(s: &str) -> View {
    match s {
        "Listagem" => View::Listagem,
        "Detalhe" => View::Detalhe,
        other => panic!("unknown view: {other}"),
    }
}

#[test]
fn route_test_vectors() {
    let raw = include_str!("../../test-vectors/routes.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let table = RouteTable::default();
    for case in vectors["cases"].as_array().unwrap() {
        let path = case["path"].as_str().unwrap();
        let resolved = table.resolve(path);

        let Some(view) = case["view"].as_str() else {
            assert!(resolved.is_none(), "{path}: expected no match");
            continue;
        };
        let matched = resolved.unwrap_or_else(|| panic!("{path}: expected a match"));
        assert_eq!(matched.view(), parse_view(view), "{path}: view");

        let expected: BTreeMap<String, String> =
            serde_json::from_value(case["params"].clone()).unwrap();
        let actual: BTreeMap<String, String> = matched.params.into_iter().collect();
        assert_eq!(actual, expected, "{path}: params");
    }
}
