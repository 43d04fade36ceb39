//! Endpoint URL template.

use std::fmt;

/// Endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.telegram.org/bot{token}/{method}";

const TOKEN_PLACEHOLDER: &str = "{token}";
const METHOD_PLACEHOLDER: &str = "{method}";

/// URL template with `{token}` and `{method}` placeholders.
///
/// Placeholders match case-insensitively and every occurrence is replaced.
/// Other braces are left alone.
///
/// ```
/// use botrpc_client::EndpointTemplate;
///
/// let template = EndpointTemplate::new("http://localhost:8081/bot{TOKEN}/{Method}");
/// assert_eq!(
///     template.resolve("123:abc", "getMe"),
///     "http://localhost:8081/bot123:abc/getMe"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EndpointTemplate(String);

impl EndpointTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Substitute `token` and `method` into the template.
    pub fn resolve(&self, token: &str, method: &str) -> String {
        let mut out = String::with_capacity(self.0.len() + token.len() + method.len());
        let mut rest = self.0.as_str();

        while let Some(start) = rest.find('{') {
            out.push_str(&rest[..start]);
            let tail = &rest[start..];
            if starts_with_ignore_case(tail, TOKEN_PLACEHOLDER) {
                out.push_str(token);
                rest = &tail[TOKEN_PLACEHOLDER.len()..];
            } else if starts_with_ignore_case(tail, METHOD_PLACEHOLDER) {
                out.push_str(method);
                rest = &tail[METHOD_PLACEHOLDER.len()..];
            } else {
                out.push('{');
                rest = &tail[1..];
            }
        }

        out.push_str(rest);
        out
    }
}

impl Default for EndpointTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT)
    }
}

impl fmt::Display for EndpointTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EndpointTemplate {
    fn from(template: &str) -> Self {
        Self::new(template)
    }
}

impl From<String> for EndpointTemplate {
    fn from(template: String) -> Self {
        Self::new(template)
    }
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack.len() >= prefix.len()
        && haystack.as_bytes()[..prefix.len()].eq_ignore_ascii_case(prefix.as_bytes())
}
