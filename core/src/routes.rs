//! Client-side route table.
//!
//! Two static routes map URL paths to views: the listing at `/` and the
//! detail page at `/operadora/:cnpj`, which forwards its `cnpj` parameter
//! to the view as an input property. Matching follows the usual router
//! defaults: query and fragment are ignored, one trailing slash is
//! optional, static segments compare ASCII case-insensitively, and
//! parameters are percent-decoded.

use crate::encoding::{decode_component, encode_component};

/// The views a route can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Listagem,
    Detalhe,
}

/// A static route declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteEntry {
    /// Path pattern; segments starting with `:` are parameters.
    pub path: &'static str,
    pub name: &'static str,
    pub view: View,
    /// Forward path parameters to the view as input properties.
    pub props: bool,
}

pub const ROUTES: &[RouteEntry] = &[
    RouteEntry {
        path: "/",
        name: "Listagem",
        view: View::Listagem,
        props: false,
    },
    RouteEntry {
        path: "/operadora/:cnpj",
        name: "Detalhe",
        view: View::Detalhe,
        props: true,
    },
];

/// Result of resolving a path against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub entry: &'static RouteEntry,
    pub params: Vec<(String, String)>,
}

impl RouteMatch {
    pub fn view(&self) -> View {
        self.entry.view
    }

    pub fn name(&self) -> &'static str {
        self.entry.name
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Parameters handed to the view. Empty unless the route forwards props.
    pub fn props(&self) -> &[(String, String)] {
        if self.entry.props {
            &self.params
        } else {
            &[]
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RouteTable {
    routes: &'static [RouteEntry],
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new(ROUTES)
    }
}

impl RouteTable {
    pub fn new(routes: &'static [RouteEntry]) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &'static [RouteEntry] {
        self.routes
    }

    /// Resolve `path` to the first matching route.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch> {
        let segments = path_segments(path);
        self.routes.iter().find_map(|entry| {
            match_pattern(entry.path, &segments).map(|params| RouteMatch { entry, params })
        })
    }

    /// Build the location of a named route, percent-encoding parameters.
    /// Returns `None` for an unknown name or a missing parameter.
    pub fn path_for(&self, name: &str, params: &[(&str, &str)]) -> Option<String> {
        let entry = self.routes.iter().find(|e| e.name == name)?;
        let mut path = String::new();
        for segment in pattern_segments(entry.path) {
            path.push('/');
            match segment.strip_prefix(':') {
                Some(key) => {
                    let (_, value) = params.iter().find(|(k, _)| *k == key)?;
                    if value.is_empty() {
                        return None;
                    }
                    path.push_str(&encode_component(value));
                }
                None => path.push_str(segment),
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        Some(path)
    }
}

fn pattern_segments(pattern: &str) -> impl Iterator<Item = &str> {
    pattern.split('/').filter(|s| !s.is_empty())
}

/// Split a location into raw path segments, dropping query, fragment and a
/// single trailing slash.
fn path_segments(path: &str) -> Vec<&str> {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = &path[..end];
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);
    if path.is_empty() {
        return Vec::new();
    }
    path.split('/').collect()
}

fn match_pattern(pattern: &str, segments: &[&str]) -> Option<Vec<(String, String)>> {
    let expected: Vec<&str> = pattern_segments(pattern).collect();
    if expected.len() != segments.len() {
        return None;
    }

    let mut params = Vec::new();
    for (want, got) in expected.iter().zip(segments) {
        if got.is_empty() {
            return None;
        }
        match want.strip_prefix(':') {
            Some(key) => params.push((key.to_string(), decode_component(got).into_owned())),
            None if want.eq_ignore_ascii_case(got) => {}
            None => return None,
        }
    }
    Some(params)
}
