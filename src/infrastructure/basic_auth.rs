use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;

/// An identifier/secret pair taken from a `Basic` Authorization header.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: String,
    pub secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Parses `Basic <base64(identifier:secret)>`.
///
/// Returns `None` for any other scheme, bad base64, non UTF-8 payloads or a
/// payload without a `:`. The scheme is case-insensitive and the secret is
/// everything after the first colon.
pub fn parse_authorization(header: &str) -> Option<Credentials> {
    let header = header.trim();
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let token = token.trim_start();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }

    let decoded = STANDARD.decode(token).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (identifier, secret) = decoded.split_once(':')?;

    Some(Credentials {
        identifier: identifier.to_string(),
        secret: secret.to_string(),
    })
}
