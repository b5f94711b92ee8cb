use super::*;
use std::collections::HashMap;

fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

fn config_with(pairs: &[(&str, &str)]) -> Result<WebConfig, ConfigError> {
    WebConfig::from_lookup(lookup_from(pairs))
}

#[test]
fn defaults_with_only_api_url() {
    let cfg = config_with(&[("PUBLIC_API_URL", "https://api.example.com")]).unwrap();
    assert_eq!(cfg.api_url.as_str(), "https://api.example.com/");
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.gate_policy, UnauthorizedPolicy::Error);
    assert_eq!(cfg.status_policy, UpstreamStatusPolicy::PassThrough);
    assert!(cfg.static_dir.is_none());
}

#[test]
fn missing_api_url_is_error() {
    let err = config_with(&[]).unwrap_err();
    assert!(matches!(err, ConfigError::Missing { var: "PUBLIC_API_URL" }));
}

#[test]
fn non_http_api_url_is_rejected() {
    let err = config_with(&[("PUBLIC_API_URL", "ftp://api.example.com")]).unwrap_err();
    assert!(err.to_string().contains("unsupported scheme"));
}

#[test]
fn garbage_api_url_is_rejected() {
    let err = config_with(&[("PUBLIC_API_URL", "not a url")]).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "PUBLIC_API_URL", .. }));
}

#[test]
fn api_url_with_query_or_fragment_is_rejected() {
    for raw in ["http://x/?k=v", "http://x/api#top", "https://api.example.com/v1?"] {
        let err = config_with(&[("PUBLIC_API_URL", raw)]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "PUBLIC_API_URL", .. }), "{raw} accepted");
    }
}

#[test]
fn all_options_parse() {
    let cfg = config_with(&[
        ("PUBLIC_API_URL", "http://localhost:8000"),
        ("PORT", "8080"),
        ("AUTH_GATE_POLICY", "Redirect"),
        ("UPSTREAM_STATUS_POLICY", "reject"),
        ("STATIC_DIR", "/srv/www"),
    ])
    .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.gate_policy, UnauthorizedPolicy::Redirect);
    assert_eq!(cfg.status_policy, UpstreamStatusPolicy::Reject);
    assert_eq!(cfg.static_dir, Some(PathBuf::from("/srv/www")));
}

#[test]
fn invalid_port_is_error() {
    let err = config_with(&[("PUBLIC_API_URL", "http://localhost"), ("PORT", "70000")]).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { var: "PORT", .. }));
}

#[test]
fn unknown_gate_policy_is_error() {
    let err = parse_gate_policy(Some("retry")).unwrap_err();
    assert!(err.to_string().contains("AUTH_GATE_POLICY"));
}

#[test]
fn unknown_status_policy_is_error() {
    let err = parse_status_policy(Some("ignore")).unwrap_err();
    assert!(err.to_string().contains("UPSTREAM_STATUS_POLICY"));
}

#[test]
fn blank_static_dir_is_ignored() {
    let cfg = config_with(&[("PUBLIC_API_URL", "http://localhost"), ("STATIC_DIR", "  ")]).unwrap();
    assert!(cfg.static_dir.is_none());
}

#[test]
fn api_endpoint_concatenates_onto_bare_host() {
    let cfg = config_with(&[("PUBLIC_API_URL", "https://api.example.com")]).unwrap();
    assert_eq!(cfg.api_endpoint("me").unwrap().as_str(), "https://api.example.com/me");
}

#[test]
fn api_endpoint_keeps_base_path_prefix() {
    let cfg = config_with(&[("PUBLIC_API_URL", "https://example.com/api/")]).unwrap();
    assert_eq!(cfg.api_endpoint("/auth/login").unwrap().as_str(), "https://example.com/api/auth/login");
}
