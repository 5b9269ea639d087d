//! Public-path allowlist.
//!
//! Paths listed here bypass token validation entirely. Everything else is
//! protected. Two match modes: exact, and subtree (the prefix itself plus
//! anything below it, `/api/v1/users` and `/api/v1/users/42` but not
//! `/api/v1/users2`).

/// Allowlist of paths reachable without a token.
#[derive(Debug, Clone)]
pub struct PublicPaths {
    exact: Vec<String>,
    subtrees: Vec<String>,
}

impl PublicPaths {
    /// Build an allowlist from exact paths and subtree prefixes.
    pub fn new<S: Into<String>>(
        exact: impl IntoIterator<Item = S>,
        subtrees: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            exact: exact.into_iter().map(Into::into).collect(),
            subtrees: subtrees
                .into_iter()
                .map(|s| s.into().trim_end_matches('/').to_string())
                .collect(),
        }
    }

    /// Whether `path` may be served without a token.
    pub fn is_public(&self, path: &str) -> bool {
        if self.exact.iter().any(|p| p == path) {
            return true;
        }
        self.subtrees
            .iter()
            .any(|p| path == p || path.starts_with(&format!("{}/", p)))
    }
}

impl Default for PublicPaths {
    /// Documentation routes, login, register, and the public user-resource
    /// subtree.
    fn default() -> Self {
        Self::new(
            [
                "/swagger-ui.html",
                "/api/v1/auth/login",
                "/api/v1/auth/register",
            ],
            ["/swagger-ui", "/v3/api-docs", "/api/v1/users"],
        )
    }
}
