//! URL parsing helpers shared across crates.
//!
//! These helpers live in `atlas-core` so both configuration loading and the
//! HTTP client agree on how a Jira base URL is spelled.

use anyhow::Result;
use url::{Position, Url};

use crate::consts::CLOUD_API_BASE_URL;

/// Normalize a URL by removing trailing slashes from the path when it's just
/// "/".
fn normalize_url(url: &Url) -> String {
  let mut result = String::new();
  result.push_str(&url[..Position::BeforePath]);

  let path = url.path().trim_end_matches('/');
  if !path.is_empty() {
    result.push_str(path);
  }

  if let Some(query) = url.query() {
    result.push('?');
    result.push_str(query);
  }

  if let Some(fragment) = url.fragment() {
    result.push('#');
    result.push_str(fragment);
  }

  result
}

/// Parse a URL by prefixing it with https:// scheme.
fn parse_with_https_prefix(input: &str) -> Result<Url> {
  let mut candidate = input;

  if let Some(colon_index) = input.find(':') {
    let potential_scheme = &input[..colon_index];
    if ["http", "https"]
      .iter()
      .any(|scheme| potential_scheme.eq_ignore_ascii_case(scheme))
    {
      let remainder = input[colon_index + 1..].trim_start_matches('/');
      if !remainder.is_empty() {
        candidate = remainder;
      }
    }
  }

  let with_scheme = format!("https://{candidate}");
  Url::parse(&with_scheme).map_err(|_| anyhow::anyhow!("Failed to parse URL: '{input}'. Ensure it has a valid scheme."))
}

/// Ensure a URL has a proper scheme (http:// or https://).
///
/// If the input doesn't include a scheme, assumes https://. Also handles
/// malformed schemes like "http:/example.com" (missing slash). Trailing
/// slashes are dropped so callers can append `/rest/...` paths directly.
pub fn ensure_url_scheme(input: &str) -> Result<String> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(anyhow::anyhow!("Host cannot be empty"));
  }

  let lowered = trimmed.to_ascii_lowercase();
  if (lowered.starts_with("http:") && !lowered.starts_with("http://"))
    || (lowered.starts_with("https:") && !lowered.starts_with("https://"))
  {
    let remainder = trimmed.split_once(':').map(|(_, rest)| rest).unwrap_or("");
    return parse_with_https_prefix(remainder.trim_start_matches('/')).map(|url| normalize_url(&url));
  }

  let url = match Url::parse(trimmed) {
    Ok(url) if url.scheme().len() > 1 && url.host().is_some() => url,
    _ => parse_with_https_prefix(trimmed)?,
  };

  Ok(normalize_url(&url))
}

/// Build the Atlassian API gateway base URL for a Cloud id.
pub fn cloud_base_url(cloud_id: &str) -> Result<String> {
  let cloud_id = cloud_id.trim();
  if cloud_id.is_empty() {
    return Err(anyhow::anyhow!("Cloud id cannot be empty"));
  }
  if !cloud_id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
    return Err(anyhow::anyhow!("Invalid Atlassian Cloud id: '{cloud_id}'"));
  }
  Ok(format!("{CLOUD_API_BASE_URL}/{cloud_id}"))
}
