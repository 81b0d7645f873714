//! `config.json` persistence.
//!
//! The file is shared with other build steps, so it is merged rather than
//! overwritten: only the `options` key is replaced, everything else is kept
//! as found. No schema is enforced.

use crate::ForgeError;
use common::PackageOptions;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{debug, warn};

/// Loads `path` (if present), stores `options` under `"options"`, writes the
/// result back pretty-printed and returns it.
pub fn merge_options(path: &Path, options: &PackageOptions) -> Result<Value, ForgeError> {
    let mut config = match std::fs::read_to_string(path) {
        Ok(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                warn!("{} is not a JSON object; starting fresh", path.display());
                Map::new()
            }
            Err(e) => {
                warn!("ignoring unreadable {}: {}", path.display(), e);
                Map::new()
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
        Err(e) => return Err(e.into()),
    };

    config.insert("options".to_string(), serde_json::to_value(options)?);
    let config = Value::Object(config);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(&config)?)?;
    debug!("wrote {}", path.display());

    Ok(config)
}
