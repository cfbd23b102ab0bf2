//! UI bundle loader.
//!
//! The UI directory holds the page layouts and the static assets of the site:
//!
//! ```text
//! ui/
//! ├── layouts/default.html   → template `layouts/default.html`
//! ├── partials/header.html   → template `partials/header.html`
//! └── css/site.css           → asset `_/css/site.css`
//! ```

use super::{FileCatalog, PublishFile, UiLoader};
use crate::{
    config::SiteConfig,
    content::media_type,
    error::{BuildError, BuildResult},
    log,
    page::SiteFile,
};
use std::{collections::BTreeMap, fs, path::Path};
use walkdir::WalkDir;

/// Output directory of UI assets.
const ASSET_DIR: &str = "_";

/// Directories whose files are templates rather than assets.
const TEMPLATE_DIRS: [&str; 2] = ["layouts", "partials"];

/// Templates and static assets of the UI.
#[derive(Debug, Default)]
pub struct UiCatalog {
    /// Template source by name, e.g. `layouts/tag.html`.
    pub templates: BTreeMap<String, String>,
    pub assets: Vec<SiteFile>,
}

impl FileCatalog for UiCatalog {
    fn publish_files(&self) -> Vec<PublishFile<'_>> {
        self.assets
            .iter()
            .map(|file| PublishFile {
                path: &file.out_path,
                media_type: &file.media_type,
                contents: &file.contents,
            })
            .collect()
    }
}

/// Loads the UI from `[build] ui`.
pub struct FsUiLoader;

impl UiLoader for FsUiLoader {
    fn load(&self, config: &SiteConfig) -> BuildResult<UiCatalog> {
        let root = &config.build.ui;
        if !root.is_dir() {
            return Err(BuildError::ui(root, "UI directory not found"));
        }

        let mut catalog = UiCatalog::default();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|err| BuildError::ui(root, err))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = relative_name(root, path)?;
            if relative.split('/').any(|part| part.starts_with('.')) {
                continue;
            }

            let contents = fs::read(path).map_err(|err| BuildError::ui(path, err))?;
            if TEMPLATE_DIRS.iter().any(|dir| relative.starts_with(&format!("{dir}/"))) {
                let source = String::from_utf8(contents).map_err(|err| BuildError::ui(path, err))?;
                catalog.templates.insert(relative, source);
            } else {
                let extname = relative.rfind('.').map_or("", |dot| &relative[dot..]);
                catalog.assets.push(SiteFile::new(
                    &format!("{ASSET_DIR}/{relative}"),
                    media_type(extname),
                    contents,
                ));
            }
        }

        log!(
            "ui";
            "{} templates, {} assets",
            catalog.templates.len(),
            catalog.assets.len()
        );
        Ok(catalog)
    }
}

/// `/`-separated path of `path` below `root`.
fn relative_name(root: &Path, path: &Path) -> BuildResult<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|err| BuildError::ui(path, err))?;
    let parts = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()
        .ok_or_else(|| BuildError::ui(path, "invalid path encoding"))?;
    Ok(parts.join("/"))
}
