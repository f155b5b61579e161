use reqwest::Url;

use crate::error::CoreError;

/// A validated node address with any embedded credentials split out.
#[derive(Debug, PartialEq, Eq)]
pub(super) struct Connection {
    /// Base URL without credentials or trailing slash.
    pub(super) url: String,
    /// `host[:port]`, used as the default node label.
    pub(super) label: String,
    pub(super) url_auth: Option<(String, String)>,
}

pub(super) fn parse_connection(connection: &str) -> Result<Connection, CoreError> {
    let mut parsed = Url::parse(connection).map_err(|e| {
        CoreError::InvalidConfig(format!(
            "invalid connection `{connection}`: expected HTTP(S) URL ({e})"
        ))
    })?;
    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(CoreError::InvalidConfig(format!(
                "unsupported connection scheme `{other}`; expected http or https"
            )));
        }
    }

    let host = parsed.host_str().ok_or_else(|| {
        CoreError::InvalidConfig(format!("connection `{connection}` has no host"))
    })?;
    let label = match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    };

    let url_auth = match (parsed.username(), parsed.password()) {
        ("", None) => None,
        (user, Some(pass)) if !user.is_empty() => Some((user.to_owned(), pass.to_owned())),
        _ => {
            return Err(CoreError::InvalidConfig(format!(
                "connection `{label}` must embed both user and password, or neither"
            )));
        }
    };
    if url_auth.is_some() {
        // Credentials travel as a basic-auth header, never in the URL.
        let _ = parsed.set_username("");
        let _ = parsed.set_password(None);
    }

    Ok(Connection {
        url: parsed.as_str().trim_end_matches('/').to_owned(),
        label,
        url_auth,
    })
}

/// Authentication precedence:
/// 1. explicit `user` + `pass`
/// 2. credentials embedded in the connection URL
/// 3. no auth
pub(super) fn resolve_auth(
    user: Option<&str>,
    pass: Option<&str>,
    url_auth: Option<(String, String)>,
) -> Result<Option<(String, String)>, CoreError> {
    match (user, pass) {
        (Some(u), Some(p)) => Ok(Some((u.to_owned(), p.to_owned()))),
        (Some(_), None) | (None, Some(_)) => Err(CoreError::InvalidConfig(
            "both node user and node pass must be set together".to_owned(),
        )),
        (None, None) => Ok(url_auth),
    }
}
