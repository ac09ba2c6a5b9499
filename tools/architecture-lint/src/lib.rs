//! Layering check for the `compass` client sources.
//!
//! Every file under `client/src/{domain,inbound,outbound}` belongs to the
//! layer named by its first directory. Each layer has a table of sibling
//! layers and external crates it may not name, either in a `use` item or in
//! a path expression. Run it with `cargo run -p architecture-lint`.

use std::collections::BTreeSet;
use std::fmt;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use syn::visit::{self, Visit};

const CRATE_NAME: &str = "compass";

/// Hexagon layer a source file lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Layer {
    /// Entities, state machines, services and ports.
    Domain,
    /// Driving adapters (the command line).
    Inbound,
    /// Driven adapters (HTTP, files, analytics).
    Outbound,
}

impl Layer {
    const ALL: [Self; 3] = [Self::Domain, Self::Inbound, Self::Outbound];

    /// Directory name under `client/src`.
    #[must_use]
    pub const fn dir(self) -> &'static str {
        match self {
            Self::Domain => "domain",
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }

    fn of(file: &Utf8Path) -> Option<Self> {
        let first = file.components().next()?.as_str();
        Self::ALL.into_iter().find(|layer| layer.dir() == first)
    }

    const fn forbidden_layers(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &["inbound", "outbound"],
            Self::Inbound => &["outbound"],
            Self::Outbound => &["inbound"],
        }
    }

    const fn forbidden_crates(self) -> &'static [&'static str] {
        match self {
            Self::Domain => &[
                "camino",
                "cap_std",
                "clap",
                "color_eyre",
                "ortho_config",
                "reqwest",
                "tracing_subscriber",
            ],
            Self::Inbound => &["camino", "cap_std", "reqwest", "tracing_subscriber"],
            Self::Outbound => &["clap", "color_eyre", "ortho_config"],
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir())
    }
}

/// What a file reached for that its layer may not use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Dependency {
    /// A sibling layer of this crate.
    Layer(&'static str),
    /// An external crate.
    Crate(&'static str),
}

/// One forbidden dependency found in one file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Finding {
    /// Path relative to `client/src`.
    pub file: Utf8PathBuf,
    /// Layer the file belongs to.
    pub layer: Layer,
    /// The forbidden dependency.
    pub dependency: Dependency,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.dependency {
            Dependency::Layer(name) => {
                write!(f, "{}: {} must not use crate::{name}", self.file, self.layer)
            }
            Dependency::Crate(name) => write!(
                f,
                "{}: {} must not use external crate `{name}`",
                self.file, self.layer
            ),
        }
    }
}

/// Reasons the check did not pass.
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    /// A directory or file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// A file lives outside the three layer directories.
    #[error("{file}: not inside a layer directory")]
    UnknownLayer {
        /// Offending file.
        file: Utf8PathBuf,
    },
    /// A file is not valid Rust.
    #[error("{file}: {message}")]
    Parse {
        /// Offending file.
        file: Utf8PathBuf,
        /// Parser message.
        message: String,
    },
    /// At least one forbidden dependency was found.
    #[error("layering violations:{}", render_findings(.0))]
    Findings(Vec<Finding>),
}

fn render_findings(findings: &[Finding]) -> String {
    findings
        .iter()
        .map(|finding| format!("\n- {finding}"))
        .collect()
}

/// A source file handed to [`check_sources`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to `client/src`.
    pub file: Utf8PathBuf,
    /// Rust source text.
    pub contents: String,
}

impl SourceFile {
    /// Pair a relative path with its contents.
    pub fn new(file: impl Into<Utf8PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            contents: contents.into(),
        }
    }
}

/// Check every layer file under `client_dir/src`.
///
/// # Errors
///
/// [`LintError::Io`] when the tree cannot be read, otherwise as for
/// [`check_sources`].
pub fn check_tree(client_dir: &Utf8Path) -> Result<(), LintError> {
    let src = client_dir.join("src");
    let mut sources = Vec::new();
    for layer in Layer::ALL {
        let dir = src.join(layer.dir());
        if dir.is_dir() {
            read_rust_files(&src, &dir, &mut sources)?;
        }
    }
    check_sources(&sources)
}

/// Check in-memory sources; every file is parsed before findings are
/// reported, so one run lists all of them.
///
/// # Errors
///
/// [`LintError::UnknownLayer`] or [`LintError::Parse`] for the first bad
/// file, otherwise [`LintError::Findings`] when anything is forbidden.
pub fn check_sources(sources: &[SourceFile]) -> Result<(), LintError> {
    let mut findings = BTreeSet::new();
    for source in sources {
        let layer = Layer::of(&source.file).ok_or_else(|| LintError::UnknownLayer {
            file: source.file.clone(),
        })?;
        let syntax = syn::parse_file(&source.contents).map_err(|err| LintError::Parse {
            file: source.file.clone(),
            message: err.to_string(),
        })?;
        let mut paths = PathRoots::default();
        paths.visit_file(&syntax);
        findings.extend(
            paths
                .0
                .iter()
                .filter_map(|path| forbidden(layer, path))
                .map(|dependency| Finding {
                    file: source.file.clone(),
                    layer,
                    dependency,
                }),
        );
    }
    if findings.is_empty() {
        Ok(())
    } else {
        Err(LintError::Findings(findings.into_iter().collect()))
    }
}

fn forbidden(layer: Layer, path: &[String]) -> Option<Dependency> {
    let (first, rest) = path.split_first()?;
    let internal = match first.as_str() {
        "crate" | "self" | "super" => rest
            .iter()
            .find(|segment| !matches!(segment.as_str(), "self" | "super")),
        CRATE_NAME => rest.first(),
        root if Layer::ALL.iter().any(|l| l.dir() == root) => Some(first),
        root => {
            return layer
                .forbidden_crates()
                .iter()
                .copied()
                .find(|name| *name == root)
                .map(Dependency::Crate);
        }
    };
    let module = internal?.as_str();
    layer
        .forbidden_layers()
        .iter()
        .copied()
        .find(|name| *name == module)
        .map(Dependency::Layer)
}

/// Every path named in a file, `use` trees expanded to their leaves.
#[derive(Default)]
struct PathRoots(BTreeSet<Vec<String>>);

impl PathRoots {
    fn add_use(&mut self, tree: &syn::UseTree, prefix: &mut Vec<String>) {
        match tree {
            syn::UseTree::Path(step) => {
                prefix.push(step.ident.to_string());
                self.add_use(&step.tree, prefix);
                prefix.pop();
            }
            syn::UseTree::Group(group) => {
                for item in &group.items {
                    self.add_use(item, prefix);
                }
            }
            syn::UseTree::Name(syn::UseName { ident })
            | syn::UseTree::Rename(syn::UseRename { ident, .. }) => {
                let mut path = prefix.clone();
                path.push(ident.to_string());
                self.0.insert(path);
            }
            syn::UseTree::Glob(_) => {
                self.0.insert(prefix.clone());
            }
        }
    }
}

impl<'ast> Visit<'ast> for PathRoots {
    fn visit_item_use(&mut self, item: &'ast syn::ItemUse) {
        self.add_use(&item.tree, &mut Vec::new());
    }

    fn visit_path(&mut self, path: &'ast syn::Path) {
        let segments: Vec<String> = path.segments.iter().map(|s| s.ident.to_string()).collect();
        if !segments.is_empty() {
            self.0.insert(segments);
        }
        visit::visit_path(self, path);
    }
}

fn read_rust_files(
    src: &Utf8Path,
    dir: &Utf8Path,
    out: &mut Vec<SourceFile>,
) -> Result<(), LintError> {
    let io_error = |path: &Utf8Path| {
        let path = path.to_owned();
        move |source: io::Error| LintError::Io { path, source }
    };
    for entry in dir.read_dir_utf8().map_err(io_error(dir))? {
        let entry = entry.map_err(io_error(dir))?;
        let path = entry.path();
        if path.is_dir() {
            read_rust_files(src, path, out)?;
        } else if path.extension() == Some("rs") {
            let contents = std::fs::read_to_string(path).map_err(io_error(path))?;
            let file = path.strip_prefix(src).unwrap_or(path).to_owned();
            out.push(SourceFile { file, contents });
        }
    }
    Ok(())
}
