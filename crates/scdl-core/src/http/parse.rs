//! Parse raw response header lines into a [`ResponseHead`].

/// Header block of the final response. Names are matched case-insensitively.
#[derive(Debug, Clone, Default)]
pub struct ResponseHead {
    headers: Vec<(String, String)>,
}

impl ResponseHead {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.get("content-type")
    }

    pub fn content_disposition(&self) -> Option<&str> {
        self.get("content-disposition")
    }
}

/// Keeps only the last header block: with redirects followed, libcurl reports
/// one block per hop, each starting with a status line.
pub(crate) fn parse_last_head(lines: &[String]) -> ResponseHead {
    let mut headers = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    ResponseHead { headers }
}
