//! C-ABI wrapper around `operadoras-core`.
//!
//! # Overview
//! Exposes request building, response validation, CNPJ formatting and
//! route resolution through `extern "C"` functions, so a host written in
//! any language with a C FFI can drive the operadoras backend while doing
//! the HTTP round trip itself.
//!
//! # Design
//! - Every `extern "C"` function wraps its body in `catch_unwind` so panics
//!   never cross the FFI boundary.
//! - Per-operation `build_*` / `parse_*` mirrors the core client 1:1.
//! - Parse results carry the backend JSON unmodified once it has been
//!   validated against the payload type.
//! - The C caller owns all returned pointers and must call the matching
//!   `operadoras_free_*` function to release them.

pub mod types;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::panic::catch_unwind;

use operadoras_core::{
    format_cnpj, ApiError, HttpResponse, OperadorasClient, Pagination, RouteTable,
};

use types::*;

/// Borrow a C string as `&str`. Invalid UTF-8 reads as empty.
///
/// # Safety
/// `ptr` must be non-null and point to a NUL-terminated string.
unsafe fn borrow_str<'a>(ptr: *const c_char) -> &'a str {
    unsafe { CStr::from_ptr(ptr) }.to_str().unwrap_or("")
}

// ---------------------------------------------------------------------------
// Client lifecycle
// ---------------------------------------------------------------------------

/// Create a client bound to `base_url`. An empty string means same-origin
/// relative URLs.
///
/// Returns null if `base_url` is null or if an internal panic occurs.
/// The caller must free the returned pointer with `operadoras_client_free`.
#[unsafe(no_mangle)]
pub extern "C" fn operadoras_client_new(base_url: *const c_char) -> *mut FfiOperadorasClient {
    catch_unwind(|| {
        if base_url.is_null() {
            return std::ptr::null_mut();
        }
        let url = unsafe { borrow_str(base_url) };
        Box::into_raw(Box::new(FfiOperadorasClient {
            inner: OperadorasClient::new(url),
        }))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Free a client created by `operadoras_client_new`. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn operadoras_client_free(client: *mut FfiOperadorasClient) {
    if !client.is_null() {
        let _ = catch_unwind(|| {
            drop(unsafe { Box::from_raw(client) });
        });
    }
}

// ---------------------------------------------------------------------------
// Build request functions
// ---------------------------------------------------------------------------

/// Build the listing request. A zero `page` or `limit` selects the default
/// (1 and 10); any other value is passed through unchanged.
///
/// Returns null if `client` is null.
/// The caller must free the returned pointer with `operadoras_free_request`.
#[unsafe(no_mangle)]
pub extern "C" fn operadoras_build_list_operadoras(
    client: *const FfiOperadorasClient,
    page: u32,
    limit: u32,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let defaults = Pagination::default();
        let pagination = Pagination::new(
            if page == 0 { defaults.page } else { page },
            if limit == 0 { defaults.limit } else { limit },
        );
        FfiHttpRequest::from_core(client.inner.build_list_operadoras(pagination))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request for one operadora.
///
/// Returns null if `client` or `cnpj` is null, or if `cnpj` is empty.
#[unsafe(no_mangle)]
pub extern "C" fn operadoras_build_get_operadora(
    client: *const FfiOperadorasClient,
    cnpj: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || cnpj.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let cnpj = unsafe { borrow_str(cnpj) };
        match client.inner.build_get_operadora(cnpj) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the request for an operadora's expense history.
///
/// Returns null if `client` or `cnpj` is null, or if `cnpj` is empty.
#[unsafe(no_mangle)]
pub extern "C" fn operadoras_build_get_despesas(
    client: *const FfiOperadorasClient,
    cnpj: *const c_char,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() || cnpj.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        let cnpj = unsafe { borrow_str(cnpj) };
        match client.inner.build_get_despesas(cnpj) {
            Ok(req) => FfiHttpRequest::from_core(req),
            Err(_) => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Build the aggregate statistics request.
///
/// Returns null if `client` is null.
#[unsafe(no_mangle)]
pub extern "C" fn operadoras_build_get_estatisticas(
    client: *const FfiOperadorasClient,
) -> *mut FfiHttpRequest {
    catch_unwind(|| {
        if client.is_null() {
            return std::ptr::null_mut();
        }
        let client = unsafe { &*client };
        FfiHttpRequest::from_core(client.inner.build_get_estatisticas())
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Parse response functions
// ---------------------------------------------------------------------------

/// Convert an `FfiHttpResponse` to a core `HttpResponse`. A null body reads
/// as empty; invalid UTF-8 is replaced with U+FFFD so error bodies survive.
fn ffi_response_to_core(resp: &FfiHttpResponse) -> HttpResponse {
    let body = if resp.body.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(resp.body) }
            .to_string_lossy()
            .into_owned()
    };
    HttpResponse {
        status: resp.status,
        headers: Vec::new(),
        body,
    }
}

/// Shared body of the `operadoras_parse_*` functions: validate the response
/// with `check`, then hand back the original body.
fn parse_with<T>(
    client: *const FfiOperadorasClient,
    response: *const FfiHttpResponse,
    check: fn(&OperadorasClient, HttpResponse) -> Result<T, ApiError>,
) -> *mut FfiApiResult {
    catch_unwind(|| {
        if client.is_null() {
            return FfiApiResult::null_arg("client");
        }
        if response.is_null() {
            return FfiApiResult::null_arg("response");
        }
        let client = unsafe { &*client };
        let response = ffi_response_to_core(unsafe { &*response });
        let (status, body) = (response.status, response.body.clone());
        match check(&client.inner, response) {
            Ok(_) => FfiApiResult::ok(status, body),
            Err(e) => FfiApiResult::from_error(e),
        }
    })
    .unwrap_or_else(|_| FfiApiResult::panic("panic during parse"))
}

/// Parse a listing response. On success `body` is the page JSON.
#[unsafe(no_mangle)]
pub extern "C" fn operadoras_parse_list_operadoras(
    client: *const FfiOperadorasClient,
    response: *const FfiHttpResponse,
) -> *mut FfiApiResult {
    parse_with(client, response, OperadorasClient::parse_list_operadoras)
}

/// Parse a single-operadora response.
#[unsafe(no_mangle)]
pub extern "C" fn operadoras_parse_get_operadora(
    client: *const FfiOperadorasClient,
    response: *const FfiHttpResponse,
) -> *mut FfiApiResult {
    parse_with(client, response, OperadorasClient::parse_get_operadora)
}

/// Parse an expense history response.
#[unsafe(no_mangle)]
pub extern "C" fn operadoras_parse_get_despesas(
    client: *const FfiOperadorasClient,
    response: *const FfiHttpResponse,
) -> *mut FfiApiResult {
    parse_with(client, response, OperadorasClient::parse_get_despesas)
}

/// Parse an aggregate statistics response.
#[unsafe(no_mangle)]
pub extern "C" fn operadoras_parse_get_estatisticas(
    client: *const FfiOperadorasClient,
    response: *const FfiHttpResponse,
) -> *mut FfiApiResult {
    parse_with(client, response, OperadorasClient::parse_get_estatisticas)
}

// ---------------------------------------------------------------------------
// Formatting and routing
// ---------------------------------------------------------------------------

/// Format a CNPJ for display. Null input yields an empty string.
///
/// The caller must free the returned string with `operadoras_free_string`.
#[unsafe(no_mangle)]
pub extern "C" fn operadoras_format_cnpj(cnpj: *const c_char) -> *mut c_char {
    catch_unwind(|| {
        let input = if cnpj.is_null() {
            None
        } else {
            Some(unsafe { borrow_str(cnpj) })
        };
        to_c_string(format_cnpj(input))
    })
    .unwrap_or(std::ptr::null_mut())
}

/// Resolve a client-side location to a view.
///
/// Returns null if `path` is null, matches no route, or decodes to a
/// `cnpj` containing a NUL byte.
/// The caller must free the returned pointer with `operadoras_free_route`.
#[unsafe(no_mangle)]
pub extern "C" fn operadoras_resolve_route(path: *const c_char) -> *mut FfiRouteMatch {
    catch_unwind(|| {
        if path.is_null() {
            return std::ptr::null_mut();
        }
        let path = unsafe { borrow_str(path) };
        match RouteTable::default().resolve(path) {
            Some(m) => FfiRouteMatch::from_core(&m),
            None => std::ptr::null_mut(),
        }
    })
    .unwrap_or(std::ptr::null_mut())
}

// ---------------------------------------------------------------------------
// Free functions
// ---------------------------------------------------------------------------

/// Free an `FfiHttpRequest` returned by any `operadoras_build_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn operadoras_free_request(req: *mut FfiHttpRequest) {
    if req.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let req = unsafe { Box::from_raw(req) };
        operadoras_free_string(req.url);
        if !req.headers.is_null() {
            let headers = unsafe {
                Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    req.headers,
                    req.headers_len as usize,
                ))
            };
            for header in headers.iter() {
                operadoras_free_string(header.key);
                operadoras_free_string(header.value);
            }
        }
    });
}

/// Free an `FfiApiResult` returned by any `operadoras_parse_*` function.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn operadoras_free_result(result: *mut FfiApiResult) {
    if result.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let result = unsafe { Box::from_raw(result) };
        operadoras_free_string(result.error_message);
        operadoras_free_string(result.body);
    });
}

/// Free an `FfiRouteMatch` returned by `operadoras_resolve_route`.
/// Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn operadoras_free_route(route: *mut FfiRouteMatch) {
    if route.is_null() {
        return;
    }
    let _ = catch_unwind(|| {
        let route = unsafe { Box::from_raw(route) };
        operadoras_free_string(route.name);
        operadoras_free_string(route.cnpj);
    });
}

/// Free a C string allocated by this library. Safe to call with null.
#[unsafe(no_mangle)]
pub extern "C" fn operadoras_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(unsafe { CString::from_raw(s) });
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn c(s: &str) -> CString {
        CString::new(s).unwrap()
    }

    fn read(ptr: *const c_char) -> String {
        assert!(!ptr.is_null());
        unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string()
    }

    fn new_client() -> *mut FfiOperadorasClient {
        let url = c("http://localhost:8000");
        operadoras_client_new(url.as_ptr())
    }

    #[test]
    fn client_new_and_free() {
        let client = new_client();
        assert!(!client.is_null());
        operadoras_client_free(client);
    }

    #[test]
    fn client_new_null_returns_null() {
        assert!(operadoras_client_new(std::ptr::null()).is_null());
    }

    #[test]
    fn client_free_null_is_safe() {
        operadoras_client_free(std::ptr::null_mut());
    }

    #[test]
    fn build_list_zero_selects_defaults() {
        let client = new_client();
        let req = operadoras_build_list_operadoras(client, 0, 0);
        let r = unsafe { &*req };
        assert!(matches!(r.method, FfiHttpMethod::Get));
        assert_eq!(read(r.url), "http://localhost:8000/api/operadoras?page=1&limit=10");
        assert_eq!(r.headers_len, 1);
        let header = unsafe { &*r.headers };
        assert_eq!(read(header.key), "accept");
        assert_eq!(read(header.value), "application/json");
        operadoras_free_request(req);
        operadoras_client_free(client);
    }

    #[test]
    fn build_list_passes_explicit_values() {
        let client = new_client();
        let req = operadoras_build_list_operadoras(client, 4, 25);
        assert_eq!(
            read(unsafe { &*req }.url),
            "http://localhost:8000/api/operadoras?page=4&limit=25"
        );
        operadoras_free_request(req);
        operadoras_client_free(client);
    }

    #[test]
    fn build_list_null_client_returns_null() {
        assert!(operadoras_build_list_operadoras(std::ptr::null(), 1, 10).is_null());
    }

    #[test]
    fn build_get_operadora_encodes_cnpj() {
        let client = new_client();
        let cnpj = c("12.345.678/0001-95");
        let req = operadoras_build_get_operadora(client, cnpj.as_ptr());
        assert_eq!(
            read(unsafe { &*req }.url),
            "http://localhost:8000/api/operadoras/12.345.678%2F0001-95"
        );
        operadoras_free_request(req);
        operadoras_client_free(client);
    }

    #[test]
    fn build_get_despesas_and_estatisticas() {
        let client = new_client();
        let cnpj = c("12345678000195");
        let req = operadoras_build_get_despesas(client, cnpj.as_ptr());
        assert_eq!(
            read(unsafe { &*req }.url),
            "http://localhost:8000/api/operadoras/12345678000195/despesas"
        );
        operadoras_free_request(req);

        let req = operadoras_build_get_estatisticas(client);
        assert_eq!(read(unsafe { &*req }.url), "http://localhost:8000/api/estatisticas");
        operadoras_free_request(req);
        operadoras_client_free(client);
    }

    #[test]
    fn build_with_empty_or_null_cnpj_returns_null() {
        let client = new_client();
        let empty = c("");
        assert!(operadoras_build_get_operadora(client, empty.as_ptr()).is_null());
        assert!(operadoras_build_get_despesas(client, std::ptr::null()).is_null());
        operadoras_client_free(client);
    }

    #[test]
    fn parse_success_returns_body_unmodified() {
        let client = new_client();
        let body = c(r#"{"data":[],"total":0,"page":1,"limit":10,"extra":"kept"}"#);
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = operadoras_parse_list_operadoras(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert!(r.error_message.is_null());
        assert_eq!(r.http_status, 200);
        assert_eq!(read(r.body), body.to_str().unwrap());
        operadoras_free_result(result);
        operadoras_client_free(client);
    }

    #[test]
    fn parse_not_found_reports_http_status() {
        let client = new_client();
        let body = c(r#"{"detail":"Operadora nao encontrada"}"#);
        let resp = FfiHttpResponse {
            status: 404,
            body: body.as_ptr(),
        };
        let result = operadoras_parse_get_operadora(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Http);
        assert_eq!(r.http_status, 404);
        assert!(r.body.is_null());
        assert!(read(r.error_message).contains("404"));
        operadoras_free_result(result);
        operadoras_client_free(client);
    }

    #[test]
    fn parse_wrong_shape_is_deserialization_error() {
        let client = new_client();
        let body = c(r#"{"data":"nope"}"#);
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = operadoras_parse_get_despesas(client, &resp);
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::Deserialization);
        operadoras_free_result(result);

        let resp = FfiHttpResponse {
            status: 200,
            body: std::ptr::null(),
        };
        let result = operadoras_parse_get_estatisticas(client, &resp);
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::Deserialization);
        operadoras_free_result(result);
        operadoras_client_free(client);
    }

    #[test]
    fn parse_null_arguments() {
        let client = new_client();
        let result = operadoras_parse_get_operadora(std::ptr::null(), std::ptr::null());
        assert_eq!(unsafe { &*result }.error_code, FfiErrorCode::NullArg);
        operadoras_free_result(result);

        let result = operadoras_parse_get_operadora(client, std::ptr::null());
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::NullArg);
        assert_eq!(read(r.error_message), "null argument: response");
        operadoras_free_result(result);
        operadoras_client_free(client);
    }

    #[test]
    fn format_cnpj_over_ffi() {
        let input = c("12345678000195");
        let out = operadoras_format_cnpj(input.as_ptr());
        assert_eq!(read(out), "12.345.678/0001-95");
        operadoras_free_string(out);

        let out = operadoras_format_cnpj(std::ptr::null());
        assert_eq!(read(out), "");
        operadoras_free_string(out);
    }

    #[test]
    fn resolve_detail_route() {
        let path = c("/operadora/12345678000195");
        let route = operadoras_resolve_route(path.as_ptr());
        let r = unsafe { &*route };
        assert_eq!(r.view, FfiView::Detalhe);
        assert_eq!(read(r.name), "Detalhe");
        assert_eq!(read(r.cnpj), "12345678000195");
        operadoras_free_route(route);
    }

    #[test]
    fn resolve_listing_route_has_no_cnpj() {
        let path = c("/");
        let route = operadoras_resolve_route(path.as_ptr());
        let r = unsafe { &*route };
        assert_eq!(r.view, FfiView::Listagem);
        assert!(r.cnpj.is_null());
        operadoras_free_route(route);
    }

    #[test]
    fn resolve_route_with_encoded_nul_returns_null() {
        let path = c("/operadora/12%0034567800019");
        assert!(operadoras_resolve_route(path.as_ptr()).is_null());

        let path = c("/operadora/12%0034");
        assert!(operadoras_resolve_route(path.as_ptr()).is_null());
    }

    #[test]
    fn parse_keeps_non_utf8_error_body() {
        let client = new_client();
        let body = CString::new(b"upstream \xff failure".to_vec()).unwrap();
        let resp = FfiHttpResponse {
            status: 502,
            body: body.as_ptr(),
        };
        let result = operadoras_parse_get_estatisticas(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Http);
        assert_eq!(r.http_status, 502);
        assert_eq!(read(r.error_message), "HTTP 502: upstream \u{FFFD} failure");
        operadoras_free_result(result);
        operadoras_client_free(client);
    }

    #[test]
    fn parse_non_utf8_success_body_is_decoded_lossily() {
        let client = new_client();
        let body = CString::new(b"{\"data\":[],\"note\":\"\xe9\"}".to_vec()).unwrap();
        let resp = FfiHttpResponse {
            status: 200,
            body: body.as_ptr(),
        };
        let result = operadoras_parse_get_despesas(client, &resp);
        let r = unsafe { &*result };
        assert_eq!(r.error_code, FfiErrorCode::Ok);
        assert_eq!(read(r.body), "{\"data\":[],\"note\":\"\u{FFFD}\"}");
        operadoras_free_result(result);
        operadoras_client_free(client);
    }

    #[test]
    fn resolve_unknown_route_returns_null() {
        let path = c("/nowhere");
        assert!(operadoras_resolve_route(path.as_ptr()).is_null());
        assert!(operadoras_resolve_route(std::ptr::null()).is_null());
    }
}
