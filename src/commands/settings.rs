use crate::error::{AnalysisError, Result};
use serde_json::{json, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

const SETTINGS_SCHEMA_VERSION: i64 = 2;

/// Effective, sanitised knobs for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSettings {
    pub canonical_size: u32,
    pub max_render_width: u32,
    pub palette_clusters: usize,
    pub cluster_restarts: usize,
    pub cluster_seed: u64,
    pub whitespace_threshold: u8,
    pub edge_low_threshold: f32,
    pub edge_high_threshold: f32,
    pub retrieval_attempts: u32,
    pub history_limit: usize,
    pub parallel_competitors: bool,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self::from_value(&default_settings())
    }
}

impl AnalysisSettings {
    /// Read from an already migrated settings object; missing keys fall back to defaults.
    pub fn from_value(settings: &Value) -> Self {
        let u = |key: &str, default: u64| settings.get(key).and_then(Value::as_u64).unwrap_or(default);
        let f = |key: &str, default: f64| settings.get(key).and_then(Value::as_f64).unwrap_or(default);

        Self {
            canonical_size: u("canonicalSize", 300) as u32,
            max_render_width: u("maxRenderWidth", 1920) as u32,
            palette_clusters: u("paletteClusters", 5) as usize,
            cluster_restarts: u("clusterRestarts", 10) as usize,
            cluster_seed: u("clusterSeed", 42),
            whitespace_threshold: u("whitespaceThreshold", 245).min(255) as u8,
            edge_low_threshold: f("edgeLowThreshold", 30.0) as f32,
            edge_high_threshold: f("edgeHighThreshold", 100.0) as f32,
            retrieval_attempts: u("retrievalAttempts", 1) as u32,
            history_limit: u("historyLimit", 10) as usize,
            parallel_competitors: settings
                .get("parallelCompetitors")
                .and_then(Value::as_bool)
                .unwrap_or(false),
        }
    }
}

pub fn load_effective_settings(workspace_path: &str) -> Result<AnalysisSettings> {
    let settings = load_settings_from_disk(workspace_path)?;
    Ok(AnalysisSettings::from_value(&settings))
}

pub fn load_settings_from_disk(workspace_path: &str) -> Result<Value> {
    let path = settings_path(workspace_path);
    ensure_brandlens_dir(workspace_path)?;

    let original = if path.exists() {
        let raw = fs::read_to_string(&path)
            .map_err(|e| AnalysisError::Settings(format!("Failed to read settings.json: {e}")))?;
        serde_json::from_str::<Value>(&raw).unwrap_or_else(|_| json!({}))
    } else {
        json!({})
    };

    let migrated = migrate_settings(original.clone());
    if migrated != original || !path.exists() {
        write_settings_file(&path, &migrated)?;
    }

    Ok(migrated)
}

pub fn save_settings_to_disk(workspace_path: &str, settings: Value) -> Result<Value> {
    let path = settings_path(workspace_path);
    ensure_brandlens_dir(workspace_path)?;

    let mut merged = load_settings_from_disk(workspace_path).unwrap_or_else(|_| default_settings());
    merge_settings(&mut merged, &settings);

    let migrated = migrate_settings(merged);
    write_settings_file(&path, &migrated)?;
    Ok(migrated)
}

pub fn brandlens_dir(workspace_path: &str) -> PathBuf {
    Path::new(workspace_path).join(".brandlens")
}

fn settings_path(workspace_path: &str) -> PathBuf {
    brandlens_dir(workspace_path).join("settings.json")
}

pub(crate) fn ensure_brandlens_dir(workspace_path: &str) -> Result<()> {
    fs::create_dir_all(brandlens_dir(workspace_path))
        .map_err(|e| AnalysisError::Settings(format!("Failed to create .brandlens directory: {e}")))
}

fn write_settings_file(path: &Path, settings: &Value) -> Result<()> {
    let raw = serde_json::to_string_pretty(settings)
        .map_err(|e| AnalysisError::Settings(format!("Failed to serialize settings: {e}")))?;
    fs::write(path, raw).map_err(|e| AnalysisError::Settings(format!("Failed to write settings.json: {e}")))
}

fn migrate_settings(input: Value) -> Value {
    let defaults = default_settings();
    let mut out = match input {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };

    let version = out
        .get("schema_version")
        .and_then(Value::as_i64)
        .unwrap_or(0);

    if version < 1 {
        // V1 stored the palette size as "numColours".
        rename_key(&mut out, "numColours", "paletteClusters");
    }

    if version < 2 {
        // V2 splits retrieval retry and concurrency out with explicit defaults.
        ensure_key(&mut out, "retrievalAttempts", json!(1));
        ensure_key(&mut out, "parallelCompetitors", json!(false));
    }

    deep_merge_defaults(&mut out, &defaults);
    sanitize_settings(&mut out);
    if let Some(obj) = out.as_object_mut() {
        obj.insert("schema_version".to_string(), json!(SETTINGS_SCHEMA_VERSION));
    }

    out
}

fn default_settings() -> Value {
    json!({
        "schema_version": SETTINGS_SCHEMA_VERSION,
        "canonicalSize": 300,
        "maxRenderWidth": 1920,
        "paletteClusters": 5,
        "clusterRestarts": 10,
        "clusterSeed": 42,
        "whitespaceThreshold": 245,
        "edgeLowThreshold": 30.0,
        "edgeHighThreshold": 100.0,
        "retrievalAttempts": 1,
        "historyLimit": 10,
        "parallelCompetitors": false
    })
}

fn deep_merge_defaults(target: &mut Value, defaults: &Value) {
    let (Some(target_obj), Some(default_obj)) = (target.as_object_mut(), defaults.as_object()) else {
        return;
    };

    for (key, default_value) in default_obj {
        match target_obj.get_mut(key) {
            Some(existing) => {
                if existing.is_object() && default_value.is_object() {
                    deep_merge_defaults(existing, default_value);
                }
            }
            None => {
                target_obj.insert(key.clone(), default_value.clone());
            }
        }
    }
}

fn ensure_key(target: &mut Value, key: &str, value: Value) {
    if let Some(obj) = target.as_object_mut() {
        obj.entry(key.to_string()).or_insert(value);
    }
}

fn rename_key(target: &mut Value, from: &str, to: &str) {
    let Some(obj) = target.as_object_mut() else {
        return;
    };
    if let Some(value) = obj.remove(from) {
        obj.entry(to.to_string()).or_insert(value);
    }
}

fn merge_settings(target: &mut Value, incoming: &Value) {
    match (target, incoming) {
        (Value::Object(target_obj), Value::Object(incoming_obj)) => {
            for (key, value) in incoming_obj {
                if let Some(existing) = target_obj.get_mut(key) {
                    merge_settings(existing, value);
                } else {
                    target_obj.insert(key.clone(), value.clone());
                }
            }
        }
        (target_slot, incoming_value) => {
            *target_slot = incoming_value.clone();
        }
    }
}

fn sanitize_settings(settings: &mut Value) {
    let Some(obj) = settings.as_object_mut() else {
        return;
    };

    clamp_u64(obj, "canonicalSize", 64, 1024, 300);
    clamp_u64(obj, "maxRenderWidth", 320, 3840, 1920);
    clamp_u64(obj, "paletteClusters", 2, 12, 5);
    clamp_u64(obj, "clusterRestarts", 1, 50, 10);
    clamp_u64(obj, "clusterSeed", 0, u64::MAX, 42);
    clamp_u64(obj, "whitespaceThreshold", 200, 254, 245);
    clamp_u64(obj, "retrievalAttempts", 1, 5, 1);
    clamp_u64(obj, "historyLimit", 1, 100, 10);
    clamp_f64(obj, "edgeLowThreshold", 1.0, 500.0, 30.0);
    clamp_f64(obj, "edgeHighThreshold", 1.0, 1000.0, 100.0);

    // Hysteresis needs low <= high.
    let low = obj.get("edgeLowThreshold").and_then(Value::as_f64).unwrap_or(30.0);
    let high = obj.get("edgeHighThreshold").and_then(Value::as_f64).unwrap_or(100.0);
    if low > high {
        obj.insert("edgeLowThreshold".to_string(), json!(high));
    }

    ensure_bool(obj, "parallelCompetitors", false);
}

fn clamp_u64(map: &mut Map<String, Value>, key: &str, min: u64, max: u64, default: u64) {
    let raw = map.get(key).and_then(Value::as_u64).unwrap_or(default);
    map.insert(key.to_string(), json!(raw.clamp(min, max)));
}

fn clamp_f64(map: &mut Map<String, Value>, key: &str, min: f64, max: f64, default: f64) {
    let raw = map.get(key).and_then(Value::as_f64).unwrap_or(default);
    map.insert(key.to_string(), json!(raw.clamp(min, max)));
}

fn ensure_bool(map: &mut Map<String, Value>, key: &str, default: bool) {
    let value = map.get(key).and_then(Value::as_bool).unwrap_or(default);
    map.insert(key.to_string(), json!(value));
}
