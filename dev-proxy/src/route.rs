//! Prefix matching for the proxy table.
//!
//! Matching is a plain string prefix test on the request path, so `/api`
//! also claims `/apiary`. The path is forwarded as-is after the target
//! URL; nothing is stripped.

use url::Url;

use crate::config::{ProxyRule, ProxyTable};

/// Where a matched request goes and which `Host` it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forward {
    pub url: String,
    /// `None` keeps the client's original `Host` header.
    pub host: Option<String>,
}

impl ProxyTable {
    pub fn resolve(&self, path_and_query: &str) -> Option<Forward> {
        self.rules()
            .iter()
            .find(|rule| path_and_query.starts_with(&rule.prefix))
            .map(|rule| rule.forward(path_and_query))
    }
}

impl ProxyRule {
    fn forward(&self, path_and_query: &str) -> Forward {
        let base = self.target.as_str().trim_end_matches('/');
        Forward {
            url: format!("{base}{path_and_query}"),
            host: self.change_origin.then(|| authority(&self.target)),
        }
    }
}

/// `host[:port]`, with the port only when it is not the scheme default.
fn authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}
