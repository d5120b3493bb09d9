//! Version sync between the upstream and packaged manifests.

use crate::error::BuildError;
use crate::staging::StagingLayout;
use crate::upstream::UpstreamSource;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, Serialize)]
pub struct VersionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    pub version: String,
}

/// Copy `version` from `upstream` into `local`, leaving every other field alone.
pub fn apply_version(local: &mut Value, upstream: &Value) -> Result<VersionPatch, BuildError> {
    let version = upstream
        .get("version")
        .and_then(Value::as_str)
        .ok_or_else(|| BuildError::Manifest("upstream manifest has no string version".to_string()))?
        .to_string();

    let fields = local
        .as_object_mut()
        .ok_or_else(|| BuildError::Manifest("local manifest is not a JSON object".to_string()))?;
    let previous = fields
        .insert("version".to_string(), Value::String(version.clone()))
        .and_then(|old| old.as_str().map(str::to_string));

    Ok(VersionPatch { previous, version })
}

/// Rewrite the staged manifest with the upstream version, pretty-printed.
pub async fn patch_version(
    source: &dyn UpstreamSource,
    layout: &StagingLayout,
    manifest: &str,
) -> Result<VersionPatch, BuildError> {
    let local_path = layout.path(manifest);
    let raw = tokio::fs::read(&local_path)
        .await
        .map_err(|e| BuildError::io(&local_path, e))?;
    let mut local: Value = serde_json::from_slice(&raw)
        .map_err(|e| BuildError::json(local_path.display().to_string(), e))?;

    let upstream = source.fetch_json_required(manifest).await?;
    let patch = apply_version(&mut local, &upstream)?;

    let pretty = serde_json::to_string_pretty(&local)
        .map_err(|e| BuildError::json(local_path.display().to_string(), e))?;
    tokio::fs::write(&local_path, pretty)
        .await
        .map_err(|e| BuildError::io(&local_path, e))?;

    tracing::info!(
        version = %patch.version,
        previous = patch.previous.as_deref().unwrap_or("-"),
        "Updated manifest version"
    );
    Ok(patch)
}
