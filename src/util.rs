// diffseek/src/util.rs

use std::path::Path;

/// Root-relative path with `/` separators. Falls back to the full path when
/// `path` is not under `root`.
pub fn normalize_rel(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    to_slash(rel)
}

/// Any path as a `/`-separated string.
pub fn to_slash(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// Non-empty `/`-separated segments.
pub fn path_parts(path: &str) -> Vec<&str> {
    path.split(['/', '\\']).filter(|s| !s.is_empty()).collect()
}

/// Last segment (file name), or the input itself if it has none.
pub fn basename(path: &str) -> &str {
    path_parts(path).last().copied().unwrap_or(path)
}

/// Last `n` segments joined with `/`. Returns every segment when `n`
/// exceeds the path depth.
pub fn last_n_parts(path: &str, n: usize) -> String {
    let parts = path_parts(path);
    let start = parts.len().saturating_sub(n);
    parts[start..].join("/")
}

/// Best-effort current directory name for messages.
pub fn get_dir_name() -> std::io::Result<String> {
    let cwd = std::env::current_dir()?;
    let canon = cwd.canonicalize().unwrap_or(cwd);
    Ok(canon
        .file_name()
        .and_then(|s| s.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| "workspace".into()))
}

/* ================================== Tests ================================== */

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn rel_paths_use_forward_slashes() {
        let root = PathBuf::from("/ws");
        assert_eq!(normalize_rel(&root, Path::new("/ws/src/main.rs")), "src/main.rs");
        assert_eq!(normalize_rel(&root, Path::new("/other/x.rs")), "/other/x.rs");
    }

    #[test]
    fn basename_and_parts() {
        assert_eq!(basename("a/b/c.ts"), "c.ts");
        assert_eq!(basename("c.ts"), "c.ts");
        assert_eq!(basename("a\\b\\win.rs"), "win.rs");
        assert_eq!(path_parts("/a//b/"), vec!["a", "b"]);
    }

    #[test]
    fn last_parts_clamp_to_depth() {
        assert_eq!(last_n_parts("/ws/src/util/mod.rs", 2), "util/mod.rs");
        assert_eq!(last_n_parts("/ws/src/util/mod.rs", 3), "src/util/mod.rs");
        assert_eq!(last_n_parts("mod.rs", 2), "mod.rs");
    }
}
