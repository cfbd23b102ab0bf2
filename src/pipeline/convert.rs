//! Markup conversion: AsciiDoc pages to HTML bodies.

use super::MarkupConverter;
use crate::{
    config::SiteConfig,
    content::{ContentCatalog, ContentItem},
    error::{BuildError, BuildResult},
    log,
    page::PageDescriptor,
    utils::command::{exec_with_input, filter_args, to_cmd_vec},
};
use std::{
    collections::BTreeMap,
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Document attributes shared by every conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupConfig {
    pub attributes: BTreeMap<String, String>,
}

/// `[build.asciidoc] attributes`, plus `site-title` and `site-url` unless
/// configured explicitly.
pub fn resolve_markup_config(config: &SiteConfig) -> MarkupConfig {
    let mut attributes = config.build.asciidoc.attributes.clone();

    let title = config.base.title.trim();
    if !title.is_empty() {
        attributes
            .entry("site-title".to_owned())
            .or_insert_with(|| title.to_owned());
    }
    if let Some(url) = &config.base.url {
        attributes
            .entry("site-url".to_owned())
            .or_insert_with(|| url.trim_end_matches('/').to_owned());
    }

    MarkupConfig { attributes }
}

/// Convert every page of the catalog; the first failure aborts.
pub fn convert_documents<'a>(
    catalog: &'a ContentCatalog,
    markup: &MarkupConfig,
    converter: &dyn MarkupConverter,
) -> BuildResult<Vec<PageDescriptor<'a>>> {
    let mut pages = Vec::new();
    for item in catalog.pages() {
        let body = converter.convert(item, markup)?;
        pages.extend(PageDescriptor::from_document(item, body));
    }

    log!("convert"; "{} documents", pages.len());
    Ok(pages)
}

// ============================================================================
// Command Converter
// ============================================================================

/// Pipes each document through an external converter, `asciidoctor` by default.
///
/// The command receives the source on stdin and prints the embeddable HTML
/// body on stdout:
///
/// ```text
/// asciidoctor -e -o - -a site-title=... -a docname=hello -
/// ```
///
/// The command runs in the project root, so relative `include::` targets and
/// `-r` requires resolve against it.
pub struct CommandConverter {
    command: Vec<String>,
    root: Option<PathBuf>,
}

impl CommandConverter {
    pub fn new(command: Vec<String>) -> Self {
        Self { command, root: None }
    }

    /// Run the command from `root` instead of the current directory.
    pub fn in_dir(mut self, root: &Path) -> Self {
        self.root = Some(root.to_path_buf());
        self
    }
}

impl MarkupConverter for CommandConverter {
    fn convert(&self, item: &ContentItem, markup: &MarkupConfig) -> BuildResult<String> {
        let conversion_error = |message: String| BuildError::Conversion {
            path: source_path(item),
            message,
        };

        let output = exec_with_input(
            self.root.as_deref(),
            &to_cmd_vec(&self.command),
            &filter_args(&command_args(item, markup)),
            &item.contents,
        )
        .map_err(|err| conversion_error(format!("{err:#}")))?;

        String::from_utf8(output).map_err(|err| conversion_error(err.to_string()))
    }
}

fn command_args(item: &ContentItem, markup: &MarkupConfig) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-e".into(), "-o".into(), "-".into()];
    for (name, value) in &markup.attributes {
        args.push("-a".into());
        args.push(format!("{name}={value}").into());
    }
    args.push("-a".into());
    args.push(format!("docname={}", item.src.stem).into());
    args.push("-".into());
    args
}

/// Display path of a source, e.g. `blog/1.0/ROOT/pages/hello.adoc`.
fn source_path(item: &ContentItem) -> String {
    let src = &item.src;
    format!(
        "{}/{}/{}/pages/{}",
        src.component, src.version, src.module, src.relative
    )
}
