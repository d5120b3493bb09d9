//! Per-locale fetch, raw copy, projection and `messages.json` output.

use super::messages::{backfill_names, ExtensionMessages};
use crate::config::LocalesConfig;
use crate::error::BuildError;
use crate::staging::StagingLayout;
use crate::upstream::{ContentKind, RawFetch, UpstreamSource};
use futures::stream::{self, StreamExt, TryStreamExt};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Outcome of the localization phase.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LocaleReport {
    pub discovered: usize,
    pub translated: Vec<String>,
    /// Locales whose translation document was unavailable
    pub skipped: Vec<String>,
    /// Locales that received the fallback locale's name
    pub backfilled: Vec<String>,
}

enum LocaleOutcome {
    Translated(String, ExtensionMessages),
    Skipped(String),
}

fn is_valid_locale(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
}

/// List locale directories under the upstream localization directory, sorted.
pub async fn discover_locales(
    source: &dyn UpstreamSource,
    l10n_dir: &str,
) -> Result<Vec<String>, BuildError> {
    let mut locales = Vec::new();
    for entry in source.list_directory(l10n_dir).await? {
        if entry.kind != ContentKind::Dir {
            continue;
        }
        if !is_valid_locale(&entry.name) {
            return Err(BuildError::Upstream(format!(
                "Invalid locale directory name: {:?}",
                entry.name
            )));
        }
        locales.push(entry.name);
    }
    locales.sort();
    Ok(locales)
}

async fn merge_locale(
    source: &dyn UpstreamSource,
    config: &LocalesConfig,
    layout: &StagingLayout,
    locale: String,
) -> Result<LocaleOutcome, BuildError> {
    let upstream_dir = format!("{}/{}", config.l10n_dir.trim_matches('/'), locale);
    let translation_path = format!("{}/{}", upstream_dir, config.translation_file);

    let bytes = match source.fetch_raw(&translation_path).await? {
        RawFetch::Found(bytes) => bytes,
        RawFetch::Unavailable { status } => {
            tracing::warn!(%locale, status, "Translation unavailable, skipping locale");
            return Ok(LocaleOutcome::Skipped(locale));
        }
    };
    let document: Value =
        serde_json::from_slice(&bytes).map_err(|e| BuildError::json(&translation_path, e))?;
    if !document.is_object() {
        return Err(BuildError::Upstream(format!(
            "{} is not a JSON object",
            translation_path
        )));
    }
    let messages = ExtensionMessages::project(&document, &config.name_key, &config.description_key);

    let out_dir = layout.path(&config.l10n_dest).join(&locale);
    tokio::fs::create_dir_all(&out_dir)
        .await
        .map_err(|e| BuildError::io(&out_dir, e))?;

    let translation_out = out_dir.join(&config.translation_file);
    let shared_out = out_dir.join(&config.shared_file);
    let shared_path = format!("{}/{}", upstream_dir, config.shared_file);
    let compact = serde_json::to_vec(&document).map_err(|e| BuildError::json(&translation_path, e))?;

    let write_translation = async {
        tokio::fs::write(&translation_out, compact)
            .await
            .map_err(|e| BuildError::io(&translation_out, e))
    };
    let fetch_shared = source.download(&shared_path, &shared_out);
    tokio::try_join!(write_translation, fetch_shared)?;

    tracing::debug!(%locale, "Merged locale");
    Ok(LocaleOutcome::Translated(locale, messages))
}

/// Fetch every locale concurrently and collect the projected messages.
///
/// Each task returns its own result; the map is built after all have joined.
pub async fn merge_translations(
    source: &dyn UpstreamSource,
    config: &LocalesConfig,
    layout: &StagingLayout,
    locales: Vec<String>,
    concurrency: usize,
) -> Result<(BTreeMap<String, ExtensionMessages>, Vec<String>), BuildError> {
    let outcomes: Vec<LocaleOutcome> = stream::iter(
        locales
            .into_iter()
            .map(|locale| merge_locale(source, config, layout, locale)),
    )
    .buffer_unordered(concurrency.max(1))
    .try_collect()
    .await?;

    let mut translations = BTreeMap::new();
    let mut skipped = Vec::new();
    for outcome in outcomes {
        match outcome {
            LocaleOutcome::Translated(locale, messages) => {
                translations.insert(locale, messages);
            }
            LocaleOutcome::Skipped(locale) => skipped.push(locale),
        }
    }
    skipped.sort();
    Ok((translations, skipped))
}

/// Write `<messages_dest>/<locale>/messages.json` for every locale.
pub async fn write_messages(
    layout: &StagingLayout,
    messages_dest: &str,
    translations: &BTreeMap<String, ExtensionMessages>,
) -> Result<usize, BuildError> {
    let root = layout.path(messages_dest);
    let writes = translations.iter().map(|(locale, messages)| {
        let dir = root.join(locale);
        async move {
            let body = serde_json::to_vec(messages)
                .map_err(|e| BuildError::json(format!("messages for {}", locale), e))?;
            tokio::fs::create_dir_all(&dir)
                .await
                .map_err(|e| BuildError::io(&dir, e))?;
            let file = dir.join("messages.json");
            tokio::fs::write(&file, body)
                .await
                .map_err(|e| BuildError::io(&file, e))
        }
    });
    futures::future::try_join_all(writes).await?;
    Ok(translations.len())
}

/// Run the whole localization phase.
pub async fn localize(
    source: &dyn UpstreamSource,
    config: &LocalesConfig,
    layout: &StagingLayout,
    concurrency: usize,
) -> Result<LocaleReport, BuildError> {
    let locales = discover_locales(source, &config.l10n_dir).await?;
    let discovered = locales.len();

    let (mut translations, skipped) =
        merge_translations(source, config, layout, locales, concurrency).await?;
    tracing::info!(
        translated = translations.len(),
        skipped = skipped.len(),
        "Downloaded addon translations"
    );

    let backfilled = backfill_names(&mut translations, &config.fallback)?;
    write_messages(layout, &config.messages_dest, &translations).await?;
    tracing::info!(
        locales = translations.len(),
        backfilled = backfilled.len(),
        "Created extension translations"
    );

    Ok(LocaleReport {
        discovered,
        translated: translations.into_keys().collect(),
        skipped,
        backfilled,
    })
}
