use std::io::Write;

use anyhow::{Context, Result};
use serde::{Serialize, de::DeserializeOwned};

use crate::processor::SessionStats;

/// Serializes an object to a JSON file.
pub fn object_to_json<T: Serialize>(output_path: &str, object: &T) -> Result<()> {
    let j = serde_json::to_string_pretty(object)?;
    let mut file = std::fs::File::create(output_path)
        .with_context(|| format!("failed to create {}", output_path))?;
    file.write_all(j.as_bytes())?;
    Ok(())
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned>(file_path: &str) -> Result<T> {
    let contents = std::fs::read_to_string(file_path)
        .with_context(|| format!("failed to read {}", file_path))?;
    serde_json::from_str(&contents).with_context(|| format!("bad json in {}", file_path))
}

/// Writes a plain-text session report.
///
/// Summarizes what the frame processor did over one run: stitched frames,
/// drops, resets and re-anchors.
pub fn write_session_report(output_path: &str, stats: &SessionStats) -> Result<()> {
    let mut s = String::new();
    s += format!("frames seen:      {}\n", stats.frames_seen).as_str();
    s += format!("frames stitched:  {}\n", stats.frames_stitched).as_str();
    s += format!("paused drops:     {}\n", stats.paused_drops).as_str();
    s += format!("user resets:      {}\n", stats.user_resets).as_str();
    s += format!("failure resets:   {}\n", stats.failure_resets).as_str();
    s += format!("re-anchors:       {}\n", stats.reanchors).as_str();
    let mut file = std::fs::File::create(output_path)
        .with_context(|| format!("failed to create {}", output_path))?;
    file.write_all(s.as_bytes())?;
    Ok(())
}
