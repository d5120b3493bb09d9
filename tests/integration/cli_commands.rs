use std::fs;

use devtools_assembler::tooling::cli::{CliContext, Commands, UpstreamArgs};

use crate::integration::support::{read_json, Fixture};

fn mirror_args(fixture: &Fixture) -> UpstreamArgs {
    UpstreamArgs {
        mirror: Some(fixture.upstream()),
        branch: None,
    }
}

#[test]
fn build_json_contract_has_required_fields() {
    let fixture = Fixture::new();
    let config_path = fixture.write_config();
    let cli = CliContext::new(fixture.workspace(), Some(config_path)).unwrap();

    let output = cli
        .execute(&Commands::Build {
            upstream: UpstreamArgs::default(),
            staging: None,
            source: None,
            format: "json".to_string(),
        })
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert!(parsed.get("upstream").and_then(|v| v.as_str()).is_some());
    assert!(parsed.get("started_at").and_then(|v| v.as_str()).is_some());
    assert_eq!(parsed["manifest"]["version"], "1.40.0");
    assert_eq!(parsed["locales"]["skipped"], serde_json::json!(["ja"]));
    assert_eq!(parsed["readme_replaced"], true);
    assert!(fixture.staging().join("_locales/pt_PT/messages.json").is_file());
}

#[test]
fn build_honors_staging_override() {
    let fixture = Fixture::new();
    let cli = CliContext::new(fixture.workspace(), Some(fixture.write_config())).unwrap();

    let output = cli
        .execute(&Commands::Build {
            upstream: mirror_args(&fixture),
            staging: Some("dist".into()),
            source: None,
            format: "text".to_string(),
        })
        .unwrap();

    assert!(output.contains("1.40.0"));
    assert!(output.contains("Published: en, fr, pt_BR, pt_PT"));
    let manifest = read_json(&fixture.workspace().join("dist/manifest.json"));
    assert_eq!(manifest["version"], "1.40.0");
    assert!(fixture.staging().join("stale.txt").exists());
}

#[test]
fn plan_lists_directories_deepest_first() {
    let fixture = Fixture::new();
    let cli = CliContext::new(fixture.workspace(), Some(fixture.write_config())).unwrap();

    let output = cli
        .execute(&Commands::Plan {
            upstream: mirror_args(&fixture),
            format: "json".to_string(),
        })
        .unwrap();

    let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        parsed["directories"],
        serde_json::json!(["find/dropdown", "find", "icons"])
    );
    assert_eq!(parsed["files"].as_array().unwrap().len(), 4);
    assert!(!fixture.staging().join("addon").exists());
}

#[test]
fn locales_lists_every_upstream_locale() {
    let fixture = Fixture::new();
    fs::write(
        fixture.upstream().join("addons-l10n/README.md"),
        "translations live here",
    )
    .unwrap();
    let cli = CliContext::new(fixture.workspace(), Some(fixture.write_config())).unwrap();

    let output = cli
        .execute(&Commands::Locales {
            upstream: mirror_args(&fixture),
            format: "json".to_string(),
        })
        .unwrap();

    let locales: Vec<String> = serde_json::from_str(&output).unwrap();
    assert_eq!(locales, vec!["en", "fr", "ja", "pt-br"]);
}

#[test]
fn config_command_prints_effective_toml() {
    let fixture = Fixture::new();
    let cli = CliContext::new(fixture.workspace(), Some(fixture.write_config())).unwrap();

    let output = cli.execute(&Commands::Config).unwrap();

    assert!(output.contains("max_concurrent_requests = 4"));
    assert!(output.contains("branch = \"master\""));
    assert!(output.contains("[[locales.aliases]]"));
}

#[test]
fn unknown_output_format_is_rejected() {
    let fixture = Fixture::new();
    let cli = CliContext::new(fixture.workspace(), Some(fixture.write_config())).unwrap();

    let result = cli.execute(&Commands::Locales {
        upstream: mirror_args(&fixture),
        format: "yaml".to_string(),
    });
    assert!(result.is_err());
}

#[test]
fn build_rejects_staging_at_workspace_root() {
    let fixture = Fixture::new();
    let cli = CliContext::new(fixture.workspace(), Some(fixture.write_config())).unwrap();

    let result = cli.execute(&Commands::Build {
        upstream: mirror_args(&fixture),
        staging: Some(".".into()),
        source: None,
        format: "text".to_string(),
    });

    assert!(result.is_err());
    assert!(fixture.workspace().join("src/manifest.json").is_file());
}
