//! Blocking HTTP GET over libcurl.
//!
//! Every network hop of a download action (page, scripts, API calls, final
//! media) goes through [`get`]. The whole body is buffered in memory; callers
//! run this from `spawn_blocking` when they are on an async runtime.

pub(crate) mod parse;

use std::collections::HashMap;
use std::str;
use std::time::Duration;

pub use parse::ResponseHead;

/// Transport knobs taken from `[http]` in config.toml.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    /// Whole-transfer limit; the only timeout a download action has.
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(300),
            user_agent: format!("scdl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Status, headers of the last response in the redirect chain, and the body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u32,
    pub head: ResponseHead,
    pub body: Vec<u8>,
    /// URL after redirects were followed.
    pub effective_url: Option<String>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body decoded as UTF-8, replacing invalid sequences.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Performs a GET and returns whatever the server answered, including non-2xx.
///
/// Follows redirects. Only transport failures (DNS, connect, timeout) are errors;
/// status handling is left to the caller.
pub fn get(
    url: &str,
    custom_headers: &HashMap<String, String>,
    opts: &HttpOptions,
) -> Result<HttpResponse, curl::Error> {
    let mut header_lines: Vec<String> = Vec::new();
    let mut body: Vec<u8> = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.timeout)?;
    easy.useragent(&opts.user_agent)?;
    easy.accept_encoding("")?;

    let mut list = curl::easy::List::new();
    for (k, v) in custom_headers {
        list.append(&format!("{}: {}", k.trim(), v.trim()))?;
    }
    if !custom_headers.is_empty() {
        easy.http_headers(list)?;
    }

    {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                header_lines.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let status = easy.response_code()?;
    let effective_url = easy.effective_url()?.map(str::to_string);
    Ok(HttpResponse {
        status,
        head: parse::parse_last_head(&header_lines),
        body,
        effective_url,
    })
}

/// Strips query and fragment so credentials never reach the log.
pub fn redact(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(mut u) => {
            u.set_query(None);
            u.set_fragment(None);
            u.to_string()
        }
        Err(_) => url.split('?').next().unwrap_or(url).to_string(),
    }
}
