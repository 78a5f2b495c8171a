// diffseek/src/scan.rs
//! Workspace enumeration for the file picker, plus single-file lookup.
//!
//! - Walk each root (gitignore-aware by default), files only
//! - Keep the *last* `max_submenu_items` paths of the combined listing
//! - Title = file name; description = shortest path suffix (>= 2 segments)
//!   no other listed file shares, or the root-relative path

use anyhow::{
    Context,
    Result
};
use ignore::WalkBuilder;
use serde::{
    Deserialize,
    Serialize
};
use std::{
    borrow::Cow,
    collections::HashMap,
    fs,
    path::{
        Path,
        PathBuf
    },
};
use crate::{
    config::Config,
    search::Searchable,
    util::{
        basename,
        last_n_parts,
        normalize_rel,
        path_parts,
        to_slash
    },
};

/// Segments used to bucket same-named files before disambiguation.
const GROUP_PARTS: usize = 2;

/* ============================== Walking ============================== */

/// Lists every file under a root. Order must be stable within one call.
pub trait DirectoryWalker {
    fn walk(&self, root: &Path) -> Result<Vec<PathBuf>>;
}

/// `ignore`-crate walker (the same filters ripgrep applies).
#[derive(Clone, Copy, Debug)]
pub struct IgnoreWalker {
    pub respect_ignore_files: bool,
}

impl Default for IgnoreWalker {
    fn default() -> Self {
        Self { respect_ignore_files: true }
    }
}

impl DirectoryWalker for IgnoreWalker {
    fn walk(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            anyhow::bail!("workspace root {} is not a directory", root.display());
        }
        let walker = WalkBuilder::new(root)
            .standard_filters(self.respect_ignore_files)
            .require_git(false)
            .sort_by_file_path(|a, b| a.cmp(b))
            .build();

        let entries = walker.map(|dent| {
            dent.map(|d| d.file_type().is_some_and(|t| t.is_file()).then(|| d.into_path()))
        });
        collect_files(root, entries)
    }
}

/// Gather file paths from walk results. The first entry error fails the walk.
fn collect_files<I>(root: &Path, entries: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator<Item = std::result::Result<Option<PathBuf>, ignore::Error>>,
{
    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("reading entry under {}", root.display()))?;
        if let Some(path) = entry {
            out.push(path);
        }
    }
    Ok(out)
}

/* ============================== Items ============================== */

/// One row in the file picker.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SubmenuItem {
    /// Full path (identity).
    pub id: String,
    /// File name.
    pub title: String,
    pub description: String,
}

impl Searchable for SubmenuItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn search_text(&self) -> Cow<'_, str> {
        Cow::Owned(format!("{} {}", self.title, self.id))
    }
}

/// Enumerate picker rows for `roots`. A root that cannot be walked, or any
/// unreadable entry inside one, fails the whole call.
pub fn enumerate_submenu_items<W>(roots: &[PathBuf], walker: &W, cfg: &Config) -> Result<Vec<SubmenuItem>>
where
    W: DirectoryWalker + ?Sized,
{
    // (root, file) pairs in walker order, root by root.
    let mut files: Vec<(&Path, String)> = Vec::new();
    for root in roots {
        let listed = walker
            .walk(root)
            .with_context(|| format!("walking {}", root.display()))?;
        tracing::debug!(root = %root.display(), files = listed.len(), "walked root");
        files.extend(listed.iter().map(|p| (root.as_path(), to_slash(p))));
    }

    if files.len() > cfg.max_submenu_items {
        let drop = files.len() - cfg.max_submenu_items;
        tracing::debug!(total = files.len(), kept = cfg.max_submenu_items, "capping enumerated files");
        files.drain(..drop);
    }

    let groups = group_by_last_parts(files.iter().map(|(_, f)| f.as_str()), GROUP_PARTS);

    let items = files
        .iter()
        .map(|(root, file)| {
            let description = if cfg.disambiguate {
                unique_suffix(file, &groups)
            } else {
                normalize_rel(root, Path::new(file))
            };
            SubmenuItem {
                id: file.clone(),
                title: basename(file).to_string(),
                description,
            }
        })
        .collect();
    Ok(items)
}

/// Bucket paths by their last `n` segments.
pub fn group_by_last_parts<'a, I>(paths: I, n: usize) -> HashMap<String, Vec<&'a str>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut groups: HashMap<String, Vec<&'a str>> = HashMap::new();
    for p in paths {
        groups.entry(last_n_parts(p, n)).or_default().push(p);
    }
    groups
}

/// Shortest suffix of `path` (at least `GROUP_PARTS` segments) that no other
/// path in its group ends with.
pub fn unique_suffix(path: &str, groups: &HashMap<String, Vec<&str>>) -> String {
    let mut n = GROUP_PARTS;
    let depth = path_parts(path).len();
    if let Some(group) = groups.get(&last_n_parts(path, n)) {
        if group.len() > 1 {
            while n < depth
                && group
                    .iter()
                    .any(|other| *other != path && last_n_parts(other, n) == last_n_parts(path, n))
            {
                n += 1;
            }
        }
    }
    last_n_parts(path, n)
}

/* ============================== Lookup ============================== */

/// Read a whole file as UTF-8. Failures carry the path.
pub fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

/// A file rendered for the chat context.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ContextItem {
    pub name: String,
    pub description: String,
    pub content: String,
}

/// Load `path` as a context item; content is fenced with its root-relative path.
pub fn file_context_item(root: &Path, path: &Path) -> Result<ContextItem> {
    let text = read_file(path)?;
    let id = to_slash(path);
    let rel = normalize_rel(root, path);
    Ok(ContextItem {
        name: basename(&id).to_string(),
        description: last_n_parts(&id, GROUP_PARTS),
        content: format!("```{rel}\n{text}\n```"),
    })
}

/* ================================== Tests ================================== */
