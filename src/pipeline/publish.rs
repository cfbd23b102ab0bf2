//! Filesystem publisher.

use super::{FileCatalog, PublishReport, Publisher};
use crate::{
    config::SiteConfig,
    error::{BuildError, BuildResult},
    log,
    utils::minify::minify,
};
use std::{collections::BTreeSet, fs, path::Path};

/// Writes every catalog file under `[build] output`.
///
/// Catalogs are written in order, so a later catalog overwrites a file of an
/// earlier one at the same path.
pub struct FsPublisher;

impl Publisher for FsPublisher {
    fn publish(&self, config: &SiteConfig, catalogs: &[&dyn FileCatalog]) -> BuildResult<PublishReport> {
        let output = &config.build.output;
        if config.build.clean && output.exists() {
            fs::remove_dir_all(output).map_err(|source| publish_error(output, source))?;
            log!("publish"; "cleaned {}", output.display());
        }

        let mut published = BTreeSet::new();
        for catalog in catalogs {
            for file in catalog.publish_files() {
                let path = output.join(file.path);
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).map_err(|source| publish_error(parent, source))?;
                }

                let contents = minify(file.media_type, file.contents, config);
                fs::write(&path, &*contents).map_err(|source| publish_error(&path, source))?;
                published.insert(file.path.to_owned());
            }
        }

        log!("publish"; "{} files to {}", published.len(), output.display());
        Ok(PublishReport {
            files: published.into_iter().collect(),
        })
    }
}

fn publish_error(path: &Path, source: std::io::Error) -> BuildError {
    BuildError::Publish {
        path: path.to_path_buf(),
        source,
    }
}
