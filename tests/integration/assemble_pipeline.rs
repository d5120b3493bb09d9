use std::fs;

use devtools_assembler::config::AssemblerConfig;
use devtools_assembler::upstream::LocalMirror;
use devtools_assembler::{Assembler, BuildError};
use serde_json::json;

use crate::integration::support::{read_json, Fixture, EN_TRANSLATION};

fn assembler(fixture: &Fixture, config: AssemblerConfig) -> Assembler {
    let mirror = LocalMirror::new(fixture.upstream()).unwrap();
    Assembler::new(Box::new(mirror), config, &fixture.workspace())
}

#[tokio::test]
async fn assembles_complete_package_from_mirror() {
    let fixture = Fixture::new();
    let report = assembler(&fixture, AssemblerConfig::default())
        .run()
        .await
        .unwrap();
    let staging = fixture.staging();

    // Wiped, then seeded from the override tree.
    assert!(!staging.join("stale.txt").exists());
    assert_eq!(report.prepare.copied_files, 4);
    assert!(staging.join("background.js").is_file());
    for dir in ["_locales", "addon", "l10n", "libraries"] {
        assert!(staging.join(dir).is_dir(), "{} missing", dir);
    }

    // Known files, including the renamed inject script.
    assert_eq!(report.known_files.files, 4);
    assert_eq!(
        fs::read_to_string(staging.join("inject/l10n.js")).unwrap(),
        "// inject l10n"
    );
    assert!(staging.join("libraries/autoescaper.js").is_file());

    // Addon subtree mirrors upstream, and nothing from other addons.
    assert_eq!(report.subtree.files, 4);
    assert_eq!(
        fs::read_to_string(staging.join("addon/find/dropdown/menu.js")).unwrap(),
        "// menu"
    );
    assert!(staging.join("addon/icons/find.svg").is_file());
    assert!(!staging.join("addon/other-addon").exists());

    // Raw localization files for translated locales only.
    assert_eq!(report.locales.discovered, 4);
    assert_eq!(report.locales.skipped, vec!["ja"]);
    assert_eq!(
        read_json(&staging.join("l10n/en/editor-devtools.json")),
        serde_json::from_str::<serde_json::Value>(EN_TRANSLATION).unwrap()
    );
    assert!(staging.join("l10n/pt-br/_general.json").is_file());
    assert!(!staging.join("l10n/ja").exists());
    assert!(!staging.join("_locales/ja").exists());

    // Extension messages, with the name backfilled from English.
    assert_eq!(
        read_json(&staging.join("_locales/en/messages.json")),
        json!({
            "extensionName": {"message": "Developer Tools"},
            "extensionDescription": {"message": "Find, clean up and navigate Scratch projects"}
        })
    );
    let fr = read_json(&staging.join("_locales/fr/messages.json"));
    assert_eq!(fr["extensionName"]["message"], "Developer Tools");
    assert_eq!(fr["extensionDescription"]["message"], "Outils pour l'éditeur");
    assert_eq!(report.locales.backfilled, vec!["fr"]);

    // pt-br becomes pt_BR, and pt_PT is an identical copy.
    assert!(!staging.join("_locales/pt-br").exists());
    let pt_br = fs::read(staging.join("_locales/pt_BR/messages.json")).unwrap();
    let pt_pt = fs::read(staging.join("_locales/pt_PT/messages.json")).unwrap();
    assert_eq!(pt_br, pt_pt);
    assert_eq!(report.aliases.len(), 2);
    assert_eq!(report.locales.translated, vec!["en", "fr", "pt-br"]);
    assert_eq!(report.published_locales, vec!["en", "fr", "pt_BR", "pt_PT"]);

    // Only the version changes in the manifest.
    let manifest = read_json(&staging.join("manifest.json"));
    assert_eq!(
        manifest,
        json!({
            "manifest_version": 3,
            "name": "__MSG_extensionName__",
            "description": "__MSG_extensionDescription__",
            "version": "1.40.0",
            "default_locale": "en",
            "permissions": ["storage"]
        })
    );
    assert_eq!(report.manifest.previous.as_deref(), Some("0.0.0"));
    let raw = fs::read_to_string(staging.join("manifest.json")).unwrap();
    assert!(raw.starts_with("{\n  \"manifest_version\": 3,"));

    // README swapped last.
    assert!(report.readme_replaced);
    assert_eq!(
        fs::read_to_string(staging.join("README.md")).unwrap(),
        "# DevTools"
    );
    assert!(!staging.join("REAL_README.md").exists());
}

#[tokio::test]
async fn rerun_produces_the_same_tree() {
    let fixture = Fixture::new();
    assembler(&fixture, AssemblerConfig::default())
        .run()
        .await
        .unwrap();
    let first = read_json(&fixture.staging().join("_locales/pt_PT/messages.json"));

    fs::write(fixture.staging().join("scratch.txt"), "temporary").unwrap();
    assembler(&fixture, AssemblerConfig::default())
        .run()
        .await
        .unwrap();

    assert!(!fixture.staging().join("scratch.txt").exists());
    assert_eq!(
        read_json(&fixture.staging().join("_locales/pt_PT/messages.json")),
        first
    );
}

#[tokio::test]
async fn missing_fallback_name_aborts_run() {
    let fixture = Fixture::new();
    fs::write(
        fixture
            .upstream()
            .join("addons-l10n/en/editor-devtools.json"),
        r#"{"editor-devtools/find":"Find"}"#,
    )
    .unwrap();

    let err = assembler(&fixture, AssemblerConfig::default())
        .run()
        .await
        .unwrap_err();
    assert!(matches!(err, BuildError::MissingFallback { .. }));
}

#[tokio::test]
async fn missing_override_tree_aborts_before_fetching() {
    let fixture = Fixture::new();
    fs::remove_dir_all(fixture.workspace().join("src")).unwrap();

    let err = assembler(&fixture, AssemblerConfig::default())
        .run()
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Override directory not found"));
    assert!(fixture.staging().join("stale.txt").exists());
}

#[tokio::test]
async fn missing_known_file_aborts_run() {
    let fixture = Fixture::new();
    fs::remove_file(fixture.upstream().join("libraries/l10n.js")).unwrap();

    let result = assembler(&fixture, AssemblerConfig::default()).run().await;
    assert!(result.is_err());
}

#[tokio::test]
async fn staging_at_workspace_root_keeps_override_tree() {
    let fixture = Fixture::new();
    let mut config = AssemblerConfig::default();
    config.paths.staging_dir = ".".into();

    let err = assembler(&fixture, config).run().await.unwrap_err();

    assert!(matches!(err, BuildError::ConfigError(_)));
    assert!(fixture.workspace().join("src/manifest.json").is_file());
    assert!(fixture.workspace().join("src/background.js").is_file());
}

#[tokio::test]
async fn staging_equal_to_override_keeps_override_tree() {
    let fixture = Fixture::new();
    let mut config = AssemblerConfig::default();
    config.paths.staging_dir = "src".into();

    let err = assembler(&fixture, config).run().await.unwrap_err();

    assert!(err.to_string().contains("overlaps"));
    assert!(fixture.workspace().join("src/manifest.json").is_file());
    assert!(fixture.workspace().join("src/background.js").is_file());
}

#[tokio::test]
async fn staging_inside_mirror_keeps_upstream_checkout() {
    let fixture = Fixture::new();
    let mut config = AssemblerConfig::default();
    config.paths.mirror_dir = Some(fixture.upstream());
    config.paths.staging_dir = fixture.upstream().join("addons");

    let err = assembler(&fixture, config).run().await.unwrap_err();

    assert!(matches!(err, BuildError::ConfigError(_)));
    assert!(fixture
        .upstream()
        .join("addons/editor-devtools/userscript.js")
        .is_file());
}
