//! Request path rewrite table
//!
//! The Cavalry WASM runtime bundle is requested under two URL forms
//! (`/CavalryWasm.js` and `/wasm-lib/CavalryWasm.js`, and likewise for the
//! module and data files) but always lives in the asset directory. The table
//! maps both forms of each bundle file to its on-disk location and takes
//! precedence over document-root resolution.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The three files that make up the WASM runtime bundle
const BUNDLE_FILES: [&str; 3] = ["CavalryWasm.js", "CavalryWasm.wasm", "CavalryWasm.data"];

/// URL prefix under which the bundle may also be requested
const BUNDLE_PREFIX: &str = "/wasm-lib";

/// Fixed request-path to file-system mapping, built once at startup.
pub struct RewriteTable {
    rules: HashMap<String, PathBuf>,
}

impl RewriteTable {
    /// Build the table for the given asset directory: 6 entries, 3 bundle
    /// files under 2 URL forms each.
    pub fn new(asset_dir: &Path) -> Self {
        let mut rules = HashMap::with_capacity(BUNDLE_FILES.len() * 2);
        for name in BUNDLE_FILES {
            let target = asset_dir.join(name);
            rules.insert(format!("/{name}"), target.clone());
            rules.insert(format!("{BUNDLE_PREFIX}/{name}"), target);
        }
        Self { rules }
    }

    /// Exact match against the raw request path.
    ///
    /// Applied before percent-decoding; encoded variants fall through to the
    /// default resolver.
    pub fn lookup(&self, path: &str) -> Option<&Path> {
        self.rules.get(path).map(PathBuf::as_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_six_paths_map_into_asset_dir() {
        let table = RewriteTable::new(Path::new("/srv/demo/wasm-lib"));

        for name in BUNDLE_FILES {
            let expected = Path::new("/srv/demo/wasm-lib").join(name);
            assert_eq!(table.lookup(&format!("/{name}")), Some(expected.as_path()));
            assert_eq!(
                table.lookup(&format!("/wasm-lib/{name}")),
                Some(expected.as_path())
            );
        }
    }

    #[test]
    fn test_non_bundle_paths_miss() {
        let table = RewriteTable::new(Path::new("/srv/demo/wasm-lib"));

        assert_eq!(table.lookup("/index.html"), None);
        assert_eq!(table.lookup("/CavalryWasm.jsx"), None);
        assert_eq!(table.lookup("/wasm-lib/other.wasm"), None);
        // Prefix match is not enough; the match is exact
        assert_eq!(table.lookup("/CavalryWasm.js/extra"), None);
        // Percent-encoded forms are left to the default resolver
        assert_eq!(table.lookup("/CavalryWasm%2Ejs"), None);
    }
}
