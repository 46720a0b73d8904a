//! Best score persistence
//!
//! A single integer under a fixed key: LocalStorage in the browser, a small JSON
//! file natively. Unreadable or missing data reads as 0; write failures are logged
//! and otherwise ignored.

use serde::{Deserialize, Serialize};

use crate::platform::BestScoreStore;

/// Storage key for the best score
pub const BEST_KEY: &str = "facebop_best_v4";

/// Parse a stored best score, tolerating junk
pub fn parse_best(raw: &str) -> u64 {
    let raw = raw.trim();
    raw.parse::<u64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v as u64))
        .unwrap_or(0)
}

/// LocalStorage-backed best score (WASM only)
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageBestScore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageBestScore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl BestScoreStore for LocalStorageBestScore {
    fn load(&self) -> u64 {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, best score starts at 0");
            return 0;
        };
        match storage.get_item(BEST_KEY) {
            Ok(Some(raw)) => {
                let best = parse_best(&raw);
                log::info!("Loaded best score {}", best);
                best
            }
            _ => 0,
        }
    }

    fn save(&mut self, best: u64) {
        let Some(storage) = Self::storage() else {
            log::warn!("LocalStorage unavailable, best score not saved");
            return;
        };
        if storage.set_item(BEST_KEY, &best.to_string()).is_err() {
            log::warn!("Failed to save best score");
        } else {
            log::info!("Best score saved ({})", best);
        }
    }
}

/// On-disk record for the native store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct BestRecord {
    best: u64,
}

/// JSON file best score (native)
#[derive(Debug, Clone)]
pub struct JsonFileBestScore {
    path: std::path::PathBuf,
}

impl JsonFileBestScore {
    pub fn new(path: impl Into<std::path::PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<tmp>/facebop_best_v4.json`
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join(format!("{BEST_KEY}.json")))
    }
}

impl BestScoreStore for JsonFileBestScore {
    fn load(&self) -> u64 {
        let Ok(json) = std::fs::read_to_string(&self.path) else {
            return 0;
        };
        match serde_json::from_str::<BestRecord>(&json) {
            Ok(record) => record.best,
            Err(e) => {
                log::warn!("Ignoring unreadable best score file {:?}: {}", self.path, e);
                0
            }
        }
    }

    fn save(&mut self, best: u64) {
        let json = match serde_json::to_string(&BestRecord { best }) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to encode best score: {}", e);
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, json) {
            log::warn!("Failed to write best score to {:?}: {}", self.path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_best() {
        assert_eq!(parse_best("120"), 120);
        assert_eq!(parse_best(" 42\n"), 42);
        assert_eq!(parse_best("87.0"), 87);
        assert_eq!(parse_best(""), 0);
        assert_eq!(parse_best("NaN"), 0);
        assert_eq!(parse_best("-5"), 0);
    }

    #[test]
    fn test_json_file_store() {
        let path = std::env::temp_dir().join(format!("facebop_test_{}.json", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let mut store = JsonFileBestScore::new(&path);
        assert_eq!(store.load(), 0);
        store.save(100);
        assert_eq!(store.load(), 100);

        std::fs::write(&path, "not json").unwrap();
        assert_eq!(store.load(), 0);

        let _ = std::fs::remove_file(&path);
    }
}
