use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const EN_TRANSLATION: &str = r#"{"editor-devtools/help-title":"Developer Tools","editor-devtools/extension-description-not-for-addon":"Find, clean up and navigate Scratch projects","editor-devtools/find":"Find"}"#;
pub const PT_BR_TRANSLATION: &str = r#"{"editor-devtools/help-title":"Ferramentas de Desenvolvedor","editor-devtools/extension-description-not-for-addon":"Encontre e organize projetos"}"#;
pub const FR_TRANSLATION: &str =
    r#"{"editor-devtools/extension-description-not-for-addon":"Outils pour l'éditeur"}"#;

fn write(path: PathBuf, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A workspace with an override tree next to an upstream checkout.
pub struct Fixture {
    pub temp: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let fixture = Self {
            temp: TempDir::new().unwrap(),
        };
        fixture.write_upstream();
        fixture.write_overrides();
        fixture
    }

    pub fn workspace(&self) -> PathBuf {
        self.temp.path().join("workspace")
    }

    pub fn upstream(&self) -> PathBuf {
        self.temp.path().join("upstream")
    }

    pub fn staging(&self) -> PathBuf {
        self.workspace().join("tmp")
    }

    /// Config file pointing the workspace at the local checkout.
    pub fn write_config(&self) -> PathBuf {
        let path = self.workspace().join("devtools.toml");
        write(
            path.clone(),
            &format!(
                "[paths]\nmirror_dir = {:?}\n\n[upstream]\nmax_concurrent_requests = 4\n",
                self.upstream().display().to_string()
            ),
        );
        path
    }

    fn write_upstream(&self) {
        let root = self.upstream();
        write(root.join("libraries/autoescaper.js"), "// autoescaper");
        write(
            root.join("libraries/intl-messageformat.umd.min.js"),
            "// intl-messageformat",
        );
        write(root.join("libraries/l10n.js"), "// l10n library");
        write(root.join("content-scripts/inject/l10n.js"), "// inject l10n");
        write(
            root.join("manifest.json"),
            r#"{"name":"Scratch Addons","version":"1.40.0","manifest_version":3}"#,
        );

        let addon = root.join("addons/editor-devtools");
        write(addon.join("addon.json"), r#"{"name":"Developer tools"}"#);
        write(addon.join("userscript.js"), "export default async function () {}");
        write(addon.join("find/dropdown/menu.js"), "// menu");
        write(addon.join("icons/find.svg"), "<svg/>");
        write(root.join("addons/other-addon/userscript.js"), "// unrelated");

        let l10n = root.join("addons-l10n");
        for (locale, translation) in [
            ("en", Some(EN_TRANSLATION)),
            ("pt-br", Some(PT_BR_TRANSLATION)),
            ("fr", Some(FR_TRANSLATION)),
            ("ja", None),
        ] {
            write(
                l10n.join(locale).join("_general.json"),
                &format!(r#"{{"_locale":"{}"}}"#, locale),
            );
            if let Some(body) = translation {
                write(l10n.join(locale).join("editor-devtools.json"), body);
            }
        }
    }

    fn write_overrides(&self) {
        let src = self.workspace().join("src");
        write(
            src.join("manifest.json"),
            r#"{"manifest_version":3,"name":"__MSG_extensionName__","description":"__MSG_extensionDescription__","version":"0.0.0","default_locale":"en","permissions":["storage"]}"#,
        );
        write(src.join("README.md"), "# Repository readme");
        write(src.join("REAL_README.md"), "# DevTools");
        write(src.join("background.js"), "// background");
        // Left over from an earlier run; must not survive the wipe.
        write(self.staging().join("stale.txt"), "stale");
    }
}

pub fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_slice(&fs::read(path).unwrap()).unwrap()
}
