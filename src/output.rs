use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::Result;
use crate::types::EventCandidate;

/// Pretty JSON with two-space indentation; non-ASCII text is written as-is
pub fn to_json(events: &[EventCandidate]) -> Result<String> {
    Ok(serde_json::to_string_pretty(events)?)
}

/// Writes the events to `path`, creating parent directories as needed
pub fn write_events(path: &Path, events: &[EventCandidate]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_json(events)?)?;
    info!("Saved {} events to {}", events.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Source;

    #[test]
    fn test_json_shape() {
        let mut event = EventCandidate::new(Source::Nthu);
        event.title = Some("校慶".into());
        let json = to_json(&[event]).unwrap();

        assert!(json.contains("\"title\": \"校慶\""));
        assert!(json.contains("\n    \"source\": \"NTHU\""));
        assert!(json.contains("\"category\": null"));

        let keys = [
            "source", "category", "title", "period", "subtitle", "description", "date_info",
            "location", "href", "image",
        ];
        let positions: Vec<usize> = keys
            .iter()
            .map(|k| json.find(&format!("\"{k}\"")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.json");
        write_events(&path, &[]).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }
}
