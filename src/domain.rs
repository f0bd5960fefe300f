//! Canonical bare hostnames for targets.

/// Turns a URL or bare domain into a lower-case hostname with no `www.`
/// prefix and no port. Internationalized names keep their Unicode form.
///
/// Never fails: odd input yields an empty or partial host instead of an error.
///
/// ```
/// use rankscrape::domain::normalize_domain;
///
/// assert_eq!(normalize_domain("http://WWW.Example.org:8080/path"), "example.org");
/// assert_eq!(normalize_domain("example.com/"), "example.com");
/// assert_eq!(normalize_domain("Bücher.de"), "bücher.de");
/// ```
pub fn normalize_domain(input: &str) -> String {
    let host = authority_host(input.trim()).to_lowercase();
    let host = strip_port(&host);
    host.strip_prefix("www.").unwrap_or(host).to_string()
}

/// Host part of the authority: scheme, credentials, path, query and fragment
/// removed.
fn authority_host(text: &str) -> &str {
    let rest = text.split_once("://").map(|(_, r)| r).unwrap_or(text);
    let authority = rest
        .split(|c| matches!(c, '/' | '\\' | '?' | '#'))
        .next()
        .unwrap_or_default();
    let host = authority.rsplit_once('@').map(|(_, h)| h).unwrap_or(authority);
    host.trim()
}

/// `[::1]:8080` keeps its bracketed address; anything else loses the text
/// after the first `:`.
fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        if let Some(end) = host.find(']') {
            return &host[..=end];
        }
    }
    host.split(':').next().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_scheme_www_port_and_path() {
        assert_eq!(normalize_domain("http://WWW.Example.org:8080/path"), "example.org");
        assert_eq!(normalize_domain("https://example.com"), "example.com");
        assert_eq!(normalize_domain("  www.Site.IO/about?x=1  "), "site.io");
    }

    #[test]
    fn bare_domain_passes_through() {
        assert_eq!(normalize_domain("example.com"), "example.com");
        assert_eq!(normalize_domain("sub.example.co.uk"), "sub.example.co.uk");
    }

    #[test]
    fn only_leading_www_is_stripped() {
        assert_eq!(normalize_domain("wwwexample.com"), "wwwexample.com");
        assert_eq!(normalize_domain("foo.www.example.com"), "foo.www.example.com");
    }

    #[test]
    fn unicode_and_ipv6_hosts() {
        assert_eq!(normalize_domain("Bücher.de"), "bücher.de");
        assert_eq!(normalize_domain("https://www.Bücher.de/katalog"), "bücher.de");
        assert_eq!(normalize_domain("http://[::1]:8080/"), "[::1]");
        assert_eq!(normalize_domain("https://user:pw@Example.com:443"), "example.com");
    }

    #[test]
    fn malformed_input_is_total() {
        assert_eq!(normalize_domain(""), "");
        assert_eq!(normalize_domain("   "), "");
        assert_eq!(normalize_domain("http://"), "");
        let odd = normalize_domain("http://exa mple.com:99/x");
        assert_eq!(odd, "exa mple.com");
        for input in ["::::", "http://[bad", "a b c", "https://WWW.x.org:notaport"] {
            let out = normalize_domain(input);
            assert_eq!(out, out.to_lowercase());
            assert!(!out.starts_with("www."));
            assert!(!out.contains(':'), "{:?} -> {:?}", input, out);
        }
    }
}
