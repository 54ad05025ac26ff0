//! File name selection for downloaded artifacts

/// Used when neither the response nor the URL yields a usable name.
pub const FALLBACK_FILE_NAME: &str = "download";

/// Extract the file name from a `Content-Disposition` header value.
///
/// `filename*=` (RFC 5987, percent-encoded) wins over a plain `filename=`.
pub fn from_content_disposition(value: &str) -> Option<String> {
    let mut plain: Option<String> = None;
    let mut extended: Option<String> = None;

    for part in value.split(';') {
        let part = part.trim();
        let Some((key, raw)) = part.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                // charset'lang'encoded-value
                let encoded = raw.trim().splitn(3, '\'').nth(2).unwrap_or(raw.trim());
                if let Ok(decoded) = urlencoding::decode(encoded) {
                    extended = Some(decoded.into_owned());
                }
            }
            "filename" => {
                plain = Some(raw.trim().trim_matches('"').to_string());
            }
            _ => {}
        }
    }

    extended.or(plain).and_then(|name| sanitize(&name))
}

/// Last non-empty path segment of `url`, ignoring query and fragment.
pub fn from_url(url: &str) -> String {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let path = path
        .split_once("://")
        .map(|(_, rest)| rest.split_once('/').map(|(_, p)| p).unwrap_or(""))
        .unwrap_or(path);

    path.rsplit('/')
        .find(|segment| !segment.is_empty())
        .and_then(|segment| {
            let decoded = urlencoding::decode(segment)
                .map(|s| s.into_owned())
                .unwrap_or_else(|_| segment.to_string());
            sanitize(&decoded)
        })
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

/// Reduce a server-supplied name to a single safe path component.
pub fn sanitize(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next().unwrap_or_default().trim();
    if last.is_empty() || last == "." || last == ".." {
        return None;
    }
    Some(last.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_disposition_plain_filename() {
        assert_eq!(
            from_content_disposition("attachment; filename=\"sample_optical.tif\""),
            Some("sample_optical.tif".to_string())
        );
    }

    #[test]
    fn content_disposition_prefers_extended_filename() {
        let header = "attachment; filename=\"fallback.zip\"; filename*=utf-8''%E7%BB%93%E6%9E%9C.zip";
        assert_eq!(from_content_disposition(header), Some("结果.zip".to_string()));
    }

    #[test]
    fn content_disposition_strips_directories() {
        assert_eq!(
            from_content_disposition("attachment; filename=\"../../etc/passwd\""),
            Some("passwd".to_string())
        );
        assert_eq!(from_content_disposition("attachment; filename=\"..\""), None);
        assert_eq!(from_content_disposition("inline"), None);
    }

    #[test]
    fn url_uses_last_segment() {
        assert_eq!(
            from_url("http://localhost:2025/api/download/original/abc123?preview=false"),
            "abc123"
        );
        assert_eq!(from_url("/exports/report%20v2.csv"), "report v2.csv");
    }

    #[test]
    fn url_without_path_falls_back() {
        assert_eq!(from_url("http://localhost:2025/"), FALLBACK_FILE_NAME);
        assert_eq!(from_url("http://localhost:2025"), FALLBACK_FILE_NAME);
    }
}
