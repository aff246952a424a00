//! Request-scoped variables (the caller's headers) handed to every function.

use std::collections::HashMap;

/// Lowercased request headers of one call.
///
/// Over HTTP these are the request headers; in process they are whatever
/// the caller attached, typically the same `authorization` / `apikey`
/// pair the HTTP transport sends:
///
/// ```json
/// {
///   "authorization": "Bearer eyJ...",
///   "apikey": "eyJ...",
///   "x-client-info": "product-hub/0.1.0"
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct Session {
    variables: HashMap<String, String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from a map of variables. Keys are lowercased.
    pub fn from_map(variables: HashMap<String, String>) -> Self {
        Self {
            variables: variables
                .into_iter()
                .map(|(key, value)| (key.to_ascii_lowercase(), value))
                .collect(),
        }
    }

    /// The `authorization` header, verbatim.
    pub fn authorization(&self) -> Option<&str> {
        self.get("authorization")
    }

    /// Token of a `Bearer` authorization header.
    pub fn bearer_token(&self) -> Option<&str> {
        self.authorization()?
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// The `apikey` header.
    pub fn api_key(&self) -> Option<&str> {
        self.get("apikey")
    }

    /// The `x-client-info` header.
    pub fn client_info(&self) -> Option<&str> {
        self.get("x-client-info")
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables
            .get(&key.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables
            .insert(key.into().to_ascii_lowercase(), value.into());
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn variables(&self) -> &HashMap<String, String> {
        &self.variables
    }
}
