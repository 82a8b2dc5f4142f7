/// HTTP middleware for the API server
///
/// - `security`: OWASP-recommended security headers on every response

pub mod security;
