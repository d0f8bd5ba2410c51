//! `#[repr(C)]` types for the FFI boundary.
//!
//! # Design
//! Each type mirrors a core type with C-compatible representations:
//! `*mut c_char` instead of `String`, raw pointers instead of `Vec`, and
//! enums with explicit discriminants. Payloads cross the boundary as the
//! backend's JSON text, so C callers parse them with whatever JSON library
//! they already use. Conversion functions live here to keep `lib.rs`
//! focused on the `extern "C"` surface.

use std::ffi::CString;
use std::os::raw::c_char;

use operadoras_core::routes::{RouteMatch, View};
use operadoras_core::{ApiError, HttpMethod};

/// Opaque handle to an `OperadorasClient`.
pub struct FfiOperadorasClient {
    pub(crate) inner: operadoras_core::OperadorasClient,
}

/// Convert a Rust string to an owned C string. Returns null if the string
/// contains an interior NUL, which C could not represent faithfully.
pub(crate) fn to_c_string(s: impl Into<Vec<u8>>) -> *mut c_char {
    CString::new(s).map_or(std::ptr::null_mut(), CString::into_raw)
}

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[repr(C)]
pub enum FfiHttpMethod {
    Get = 0,
}

impl From<HttpMethod> for FfiHttpMethod {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => FfiHttpMethod::Get,
        }
    }
}

/// A single HTTP header as a key-value pair of C strings.
#[repr(C)]
pub struct FfiHeader {
    pub key: *mut c_char,
    pub value: *mut c_char,
}

/// An HTTP request described as C-compatible plain data.
///
/// Built by `operadoras_build_*` functions. The C caller executes the
/// request and passes the response back through `operadoras_parse_*`.
#[repr(C)]
pub struct FfiHttpRequest {
    pub method: FfiHttpMethod,
    pub url: *mut c_char,
    pub headers: *mut FfiHeader,
    pub headers_len: u32,
}

impl FfiHttpRequest {
    /// Convert a core `HttpRequest` into a heap-allocated `FfiHttpRequest`.
    pub(crate) fn from_core(req: operadoras_core::HttpRequest) -> *mut Self {
        let headers_len = req.headers.len() as u32;
        let headers = if req.headers.is_empty() {
            std::ptr::null_mut()
        } else {
            let ffi_headers: Box<[FfiHeader]> = req
                .headers
                .into_iter()
                .map(|(k, v)| FfiHeader {
                    key: to_c_string(k),
                    value: to_c_string(v),
                })
                .collect();
            Box::into_raw(ffi_headers) as *mut FfiHeader
        };

        Box::into_raw(Box::new(FfiHttpRequest {
            method: req.method.into(),
            url: to_c_string(req.url),
            headers,
            headers_len,
        }))
    }
}

// ---------------------------------------------------------------------------
// Response input (caller-provided, not heap-allocated by us)
// ---------------------------------------------------------------------------

/// An HTTP response described as C-compatible plain data.
///
/// The C caller constructs this after executing a request and passes a
/// pointer to an `operadoras_parse_*` function. The FFI layer reads but
/// does not free these fields.
#[repr(C)]
pub struct FfiHttpResponse {
    pub status: u16,
    pub body: *const c_char,
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Error codes returned in `FfiApiResult`.
///
/// `operadoras_parse_*` only produces `Ok`, `Http`, `Deserialization`,
/// `Panic` and `NullArg`. `Network`, `Timeout` and `InvalidIdentifier` are
/// reserved so a host can report its own transport failures, or a rejected
/// identifier from a null `operadoras_build_*` result, with the same codes
/// as the Rust `ApiError`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiErrorCode {
    Ok = 0,
    Http = 1,
    Deserialization = 2,
    Network = 3,
    Timeout = 4,
    InvalidIdentifier = 5,
    Panic = 6,
    NullArg = 7,
}

/// Result envelope for all parse operations.
///
/// On success `error_code` is `Ok`, `error_message` is null and `body` is
/// the backend's JSON payload, unmodified. On failure `body` is null,
/// `error_message` is human readable and `http_status` carries the
/// backend status when there was one.
#[repr(C)]
pub struct FfiApiResult {
    pub error_code: FfiErrorCode,
    pub error_message: *mut c_char,
    pub http_status: u16,
    pub body: *mut c_char,
}

impl FfiApiResult {
    fn boxed(
        error_code: FfiErrorCode,
        error_message: *mut c_char,
        http_status: u16,
        body: *mut c_char,
    ) -> *mut Self {
        Box::into_raw(Box::new(FfiApiResult {
            error_code,
            error_message,
            http_status,
            body,
        }))
    }

    pub(crate) fn ok(status: u16, body: String) -> *mut Self {
        Self::boxed(FfiErrorCode::Ok, std::ptr::null_mut(), status, to_c_string(body))
    }

    pub(crate) fn from_error(err: ApiError) -> *mut Self {
        let error_code = match &err {
            ApiError::Http { .. } => FfiErrorCode::Http,
            ApiError::Deserialization(_) => FfiErrorCode::Deserialization,
            ApiError::Network(_) => FfiErrorCode::Network,
            ApiError::Timeout => FfiErrorCode::Timeout,
            ApiError::InvalidIdentifier => FfiErrorCode::InvalidIdentifier,
        };
        let status = err.status().unwrap_or(0);
        Self::boxed(error_code, to_c_string(err.to_string()), status, std::ptr::null_mut())
    }

    pub(crate) fn null_arg(name: &str) -> *mut Self {
        Self::boxed(
            FfiErrorCode::NullArg,
            to_c_string(format!("null argument: {name}")),
            0,
            std::ptr::null_mut(),
        )
    }

    pub(crate) fn panic(msg: &str) -> *mut Self {
        Self::boxed(FfiErrorCode::Panic, to_c_string(msg), 0, std::ptr::null_mut())
    }
}

// ---------------------------------------------------------------------------
// Routes
// ---------------------------------------------------------------------------

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FfiView {
    Listagem = 0,
    Detalhe = 1,
}

impl From<View> for FfiView {
    fn from(v: View) -> Self {
        match v {
            View::Listagem => FfiView::Listagem,
            View::Detalhe => FfiView::Detalhe,
        }
    }
}

/// A resolved route. `cnpj` is null unless the view receives it as input.
#[repr(C)]
pub struct FfiRouteMatch {
    pub view: FfiView,
    pub name: *mut c_char,
    pub cnpj: *mut c_char,
}

impl FfiRouteMatch {
    /// Returns null if the decoded `cnpj` contains a NUL byte.
    pub(crate) fn from_core(m: &RouteMatch) -> *mut Self {
        let cnpj = match m.props().iter().find(|(k, _)| k == "cnpj") {
            Some((_, v)) => {
                let cnpj = to_c_string(v.as_str());
                if cnpj.is_null() {
                    return std::ptr::null_mut();
                }
                cnpj
            }
            None => std::ptr::null_mut(),
        };
        Box::into_raw(Box::new(FfiRouteMatch {
            view: m.view().into(),
            name: to_c_string(m.name()),
            cnpj,
        }))
    }
}
