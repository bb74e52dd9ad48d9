#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use kairos_core::{ErrorCode, KairosError};
use kairos_reporter::config::{self, HostPort};
use kairos_reporter::host::resolve_host_template;
use kairos_reporter::registry::{Counter, Metric, MetricFilter, PatternColor, PatternFilter};
use kairos_reporter::units::TimeUnit;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
kairosdb:
  hosts: ["localhost:4242"]
  predicate:
    colour: white # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG");
}

#[test]
fn ok_minimal_config() {
    let ok = r#"
version: 1
kairosdb:
  hosts: ["tsdb.example.com:4242"]
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.version, 1);
    let k = &cfg.kairosdb;
    assert_eq!(k.period_ms, 60_000);
    assert_eq!(k.rate_unit, TimeUnit::Seconds);
    assert_eq!(k.duration_unit, TimeUnit::Milliseconds);
    assert!(k.prefix.is_none());
    assert!(k.resolved_tags().unwrap().is_empty());
    assert!(k.filter().unwrap().is_none());
    assert_eq!(
        k.primary_host().unwrap(),
        HostPort { host: "tsdb.example.com".into(), port: 4242 }
    );
}

#[test]
fn full_config() {
    let ok = r#"
version: 1
kairosdb:
  hosts: ["a:4242", "b:4242"]
  period_ms: 10000
  prefix: "app"
  rate_unit: minutes
  duration_unit: microseconds
  tags:
    host: "web-1"
    dc: "eu/west"
  predicate:
    color: black
    patterns: ["^jvm\\."]
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    let k = &cfg.kairosdb;
    assert_eq!(k.rate_unit, TimeUnit::Minutes);
    assert_eq!(k.duration_unit, TimeUnit::Microseconds);
    assert_eq!(k.primary_host().unwrap().host, "a");

    // map keys come out sorted
    let tags = k.resolved_tags().unwrap();
    assert_eq!(tags.iter().collect::<Vec<_>>(), vec![("dc", "eu/west"), ("host", "web-1")]);

    let filter = k.filter().unwrap().unwrap();
    let metric = Metric::Counter(Arc::new(Counter::new()));
    assert!(!filter.matches("jvm.heap", &metric));
    assert!(filter.matches("app.requests", &metric));
}

#[test]
fn white_list_keeps_only_matching_names() {
    let ok = r#"
version: 1
kairosdb:
  hosts: ["a:4242"]
  predicate:
    patterns: ["^app\\.", "\\.errors$"]
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    let predicate = cfg.kairosdb.predicate.as_ref().unwrap();
    assert_eq!(predicate.color, PatternColor::White);

    let filter = cfg.kairosdb.filter().unwrap().unwrap();
    let metric = Metric::Counter(Arc::new(Counter::new()));
    assert!(filter.matches("app.requests", &metric));
    assert!(filter.matches("db.errors", &metric));
    assert!(!filter.matches("jvm.heap", &metric));
    assert!(!filter.matches("myapp.requests", &metric));
}

#[test]
fn empty_white_list_drops_everything() {
    let filter = PatternFilter::new(PatternColor::White, &[]).unwrap();
    let metric = Metric::Counter(Arc::new(Counter::new()));
    assert!(!filter.matches("app.requests", &metric));

    let filter = PatternFilter::new(PatternColor::Black, &[]).unwrap();
    assert!(filter.matches("app.requests", &metric));
}

#[test]
fn invalid_pattern_is_a_config_error() {
    let err = PatternFilter::new(PatternColor::White, &["(".to_string()]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::Config);
}

#[test]
fn unsupported_version() {
    let err = config::load_from_str("version: 2\nkairosdb:\n  hosts: [\"a:1\"]\n").unwrap_err();
    assert!(matches!(err, KairosError::UnsupportedVersion));
}

#[test]
fn no_host_configured() {
    let err = config::load_from_str("version: 1\nkairosdb: {}\n").unwrap_err();
    assert!(matches!(err, KairosError::NoHostConfigured));
    assert_eq!(err.code(), ErrorCode::Config);
}

#[test]
fn invalid_tag_fails_at_load() {
    let bad = r#"
version: 1
kairosdb:
  hosts: ["a:4242"]
  tags:
    host: "invalid!"
"#;
    let err = config::load_from_str(bad).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidTag);
}

#[test]
fn unknown_placeholder_is_an_invalid_tag() {
    let bad = r#"
version: 1
kairosdb:
  hosts: ["a:4242"]
  tags:
    host: "${host.address}"
"#;
    let err = config::load_from_str(bad).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidTag);
}

#[test]
fn out_of_range_values() {
    for bad in [
        "version: 1\nkairosdb:\n  hosts: [\"a\"]\n",
        "version: 1\nkairosdb:\n  hosts: [\"a:0\"]\n",
        "version: 1\nkairosdb:\n  hosts: [\"a:99999\"]\n",
        "version: 1\nkairosdb:\n  hosts: [\":4242\"]\n",
        "version: 1\nkairosdb:\n  hosts: [\"a:1\"]\n  period_ms: 10\n",
        "version: 1\nkairosdb:\n  hosts: [\"a:1\"]\n  prefix: \"  \"\n",
        "version: 1\nkairosdb:\n  hosts: [\"a:1\"]\n  rate_unit: fortnights\n",
        "version: 1\nkairosdb:\n  hosts: [\"a:1\"]\n  predicate:\n    patterns: [\"(\"]\n",
    ] {
        let err = config::load_from_str(bad).expect_err(bad);
        assert_eq!(err.code(), ErrorCode::Config, "input={bad}");
    }
}

#[test]
fn ipv6_host() {
    let hp = HostPort::parse("[::1]:4242").unwrap();
    assert_eq!(hp.host, "::1");
    assert_eq!(hp.port, 4242);
    assert_eq!(hp.to_string(), "[::1]:4242");
}

#[test]
fn missing_file() {
    let err = config::load_from_file("does/not/exist.yaml").unwrap_err();
    assert_eq!(err.code(), ErrorCode::Config);
}

#[test]
fn host_templates() {
    assert_eq!(resolve_host_template("static").unwrap(), "static");

    let host = resolve_host_template("${host.name}").unwrap();
    assert!(!host.is_empty());
    assert!(!host.contains("${"));

    let short = resolve_host_template("${host.name.short}").unwrap();
    assert!(host.starts_with(&short));
    assert!(!short.contains('.'));
}
