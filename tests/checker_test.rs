use compose_lint::config::lint::{LintConfig, LintSettings};
use compose_lint::{Checker, ComposeManifest, Severity};

const DEV_STACK: &str = include_str!("../configs/dev-stack.yml");

fn check_with_defaults(yaml: &str) -> compose_lint::CheckReport {
    let manifest = ComposeManifest::from_yaml_str(yaml).unwrap();
    Checker::new(LintSettings::default()).run(&manifest)
}

#[test]
fn test_dev_stack_is_clean() {
    let report = check_with_defaults(DEV_STACK);

    assert!(report.is_clean(), "unexpected findings: {:?}", report.findings);
    assert_eq!(report.services_checked, 5);
    assert_eq!(report.exit_code(false), 0);
    assert_eq!(report.exit_code(true), 0);
}

#[test]
fn test_removing_a_linked_service_breaks_the_stack() {
    let mut manifest = ComposeManifest::from_yaml_str(DEV_STACK).unwrap();
    manifest.services.remove("redis");

    let report = Checker::new(LintSettings::default()).run(&manifest);

    let link_errors: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.rule == "links" && f.severity == Severity::Error)
        .collect();
    assert_eq!(link_errors.len(), 1);
    assert_eq!(link_errors[0].service.as_deref(), Some("timesketch"));
    assert!(link_errors[0].message.contains("redis"));
    assert_eq!(report.exit_code(false), 1);
}

#[test]
fn test_port_collision_between_app_and_notebook() {
    let yaml = DEV_STACK.replace("127.0.0.1:8844:8844", "127.0.0.1:5000:8844");
    let report = check_with_defaults(&yaml);

    assert!(report
        .findings
        .iter()
        .any(|f| f.rule == "port-collision" && f.message.contains("5000")));
}

#[test]
fn test_world_bound_port_warns_under_default_rules() {
    let yaml = DEV_STACK.replace("127.0.0.1:5000:5000", "0.0.0.0:5000:5000");
    let report = check_with_defaults(&yaml);

    assert_eq!(report.error_count(), 0);
    assert_eq!(report.warning_count(), 1);
    assert_eq!(report.exit_code(false), 2);
    assert_eq!(report.exit_code(true), 1);
}

#[test]
fn test_loopback_rule_can_be_disabled_via_toml() {
    let settings = LintConfig::from_toml_str("[rules]\nrequire_loopback_ports = false\n")
        .unwrap()
        .into_settings();

    let yaml = DEV_STACK.replace("127.0.0.1:5000:5000", "0.0.0.0:5000:5000");
    let manifest = ComposeManifest::from_yaml_str(&yaml).unwrap();
    let report = Checker::new(settings).run(&manifest);

    assert!(report.is_clean());
}

#[test]
fn test_pinned_image_rule_flags_latest_tags() {
    let settings = LintConfig::from_toml_str("[rules]\nrequire_pinned_images = true\n")
        .unwrap()
        .into_settings();

    let manifest = ComposeManifest::from_yaml_str(DEV_STACK).unwrap();
    let report = Checker::new(settings).run(&manifest);

    // timesketch and notebook images float on :latest
    let flagged: Vec<_> = report
        .findings
        .iter()
        .filter(|f| f.rule == "pinned-image")
        .collect();
    assert_eq!(flagged.len(), 2);
}

#[test]
fn test_bad_volume_and_restart_specs() {
    let report = check_with_defaults(
        r#"
services:
  app:
    image: acme/app:dev
    restart: whenever
    volumes:
      - ./src:/app:zz
"#,
    );

    assert!(report.findings.iter().any(|f| f.rule == "restart"));
    assert!(report.findings.iter().any(|f| f.rule == "volumes"));
    assert_eq!(report.exit_code(false), 1);
}

#[test]
fn test_max_services_limit() {
    let settings = LintConfig::from_toml_str("[rules]\nmax_services = 3\n")
        .unwrap()
        .into_settings();

    let manifest = ComposeManifest::from_yaml_str(DEV_STACK).unwrap();
    let report = Checker::new(settings).run(&manifest);

    assert!(report
        .findings
        .iter()
        .any(|f| f.rule == "max-services" && f.severity == Severity::Warning));
}

#[test]
fn test_missing_version_is_only_an_info() {
    let report = check_with_defaults(
        r#"
services:
  redis:
    image: redis:6.0.10-alpine
"#,
    );

    assert_eq!(report.error_count(), 0);
    assert_eq!(report.warning_count(), 0);
    assert_eq!(report.info_count(), 1);
    assert_eq!(report.exit_code(false), 0);
}
