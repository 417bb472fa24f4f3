//! Netscape cookie-jar parsing (the `cookies.txt` format browsers export).

/// One cookie line: domain, subdomain flag, path, secure, expiry, name, value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    pub domain: String,
    pub include_subdomains: bool,
    pub path: String,
    pub secure: bool,
    /// Unix seconds; 0 marks a session cookie.
    pub expires: u64,
    pub name: String,
    pub value: String,
}

impl Cookie {
    /// True if the cookie is sent to `host` (exact match or a subdomain of it).
    pub fn matches_domain(&self, host: &str) -> bool {
        let domain = self.domain.trim_start_matches('.');
        domain.eq_ignore_ascii_case(host)
            || domain
                .to_ascii_lowercase()
                .ends_with(&format!(".{}", host.to_ascii_lowercase()))
    }

    pub fn is_expired(&self, now_secs: u64) -> bool {
        self.expires != 0 && self.expires <= now_secs
    }
}

/// Parses a cookie jar, skipping comments and malformed lines.
pub fn parse_cookie_jar(data: &str) -> Vec<Cookie> {
    data.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<Cookie> {
    let line = line.trim_end_matches(['\r', '\n']);
    let line = match line.strip_prefix("#HttpOnly_") {
        Some(rest) => rest,
        None if line.starts_with('#') || line.trim().is_empty() => return None,
        None => line,
    };
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() < 7 {
        return None;
    }
    Some(Cookie {
        domain: fields[0].to_string(),
        include_subdomains: fields[1].eq_ignore_ascii_case("TRUE"),
        path: fields[2].to_string(),
        secure: fields[3].eq_ignore_ascii_case("TRUE"),
        expires: fields[4].trim().parse().unwrap_or(0),
        name: fields[5].to_string(),
        value: fields[6..].join("\t"),
    })
}
