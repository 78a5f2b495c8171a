// diffseek/src/commands.rs

use anyhow::{
    Result,
    Context,
    anyhow
};
use std::{
    env,
    io::{
        self,
        Write
    },
    path::{
        Path,
        PathBuf
    }
};
use crate::{
    config::Config,
    diff,
    diff_line::{
        render_diff,
        DiffKind,
        DiffLine,
        DiffStats
    },
    markers,
    scan::{
        self,
        IgnoreWalker
    },
    search::{
        search_with,
        NucleoScorer
    },
    util
};


/// Parsed command line: positionals in order, `--key[=value]` flags, `-v` count.
#[derive(Debug, Default)]
pub struct Args {
    pub positional: Vec<String>,
    pub flags: Vec<(String, Option<String>)>,
    pub verbose: u8,
}

impl Args {
    pub fn parse<I: IntoIterator<Item = String>>(raw: I) -> Self {
        let mut out = Args::default();
        for a in raw {
            if a == "-v" {
                out.verbose += 1;
            } else if a == "-vv" {
                out.verbose += 2;
            } else if let Some(rest) = a.strip_prefix("--") {
                match rest.split_once('=') {
                    Some((k, v)) => out.flags.push((k.to_string(), Some(v.to_string()))),
                    None => out.flags.push((rest.to_string(), None)),
                }
            } else {
                out.positional.push(a);
            }
        }
        out
    }

    pub fn has(&self, key: &str) -> bool {
        self.flags.iter().any(|(k, _)| k == key)
    }

    pub fn value(&self, key: &str) -> Option<&str> {
        self.flags.iter().rev().find(|(k, _)| k == key).and_then(|(_, v)| v.as_deref())
    }

    fn pos(&self, i: usize) -> Option<&str> {
        self.positional.get(i).map(String::as_str)
    }
}

/// Install the stderr `tracing` subscriber. `RUST_LOG` wins over `-v`.
pub fn init_logging(verbose: u8) {
    use tracing_subscriber::EnvFilter;
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .try_init();
}

pub fn run_cli() -> Result<()> {
    let args = Args::parse(env::args().skip(1));
    init_logging(args.verbose);

    let cmd = args.pos(0).unwrap_or("help");
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cmd {
        "diff"   => cmd_diff(&args, &mut out)?,
        "files"  => cmd_files(&args, &mut out)?,
        "search" => cmd_search(&args, &mut out)?,
        "show"   => cmd_show(&args, &mut out)?,
        "help" | _ => print_help(&mut out)?,
    }
    Ok(())
}

fn load_config(args: &Args) -> Result<Config> {
    let cwd = env::current_dir().context("failed to get current_dir")?;
    let mut cfg = Config::load(args.value("config").map(Path::new), &cwd)?;
    if args.has("full-paths") {
        cfg.disambiguate = false;
    }
    if args.has("no-ignore") {
        cfg.respect_ignore_files = false;
    }
    if let Some(n) = parse_limit(args.value("limit")) {
        cfg.max_results = n;
    }
    Ok(cfg)
}

fn parse_limit(arg: Option<&str>) -> Option<usize> {
    arg?.trim().parse::<usize>().ok().filter(|n| *n > 0)
}

/// Roots from positionals starting at `from`; current dir if none.
fn roots_from(args: &Args, from: usize) -> Result<Vec<PathBuf>> {
    let given: Vec<PathBuf> = args.positional.iter().skip(from).map(PathBuf::from).collect();
    if !given.is_empty() {
        return Ok(given);
    }
    Ok(vec![env::current_dir().context("failed to get current_dir")?])
}

/// `diffseek diff <old> <new> [--json] [--markers] [--stat]`
fn cmd_diff<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let (old_path, new_path) = match (args.pos(1), args.pos(2)) {
        (Some(a), Some(b)) => (Path::new(a), Path::new(b)),
        _ => return Err(anyhow!("usage: diffseek diff <old> <new> [--json] [--markers] [--stat]")),
    };
    let old = scan::read_file(old_path)?;
    let new = scan::read_file(new_path)?;

    if args.has("json") {
        let lines: Vec<DiffLine<'_>> = diff::diff_text(&old, &new).collect();
        let stats: DiffStats = lines.iter().copied().collect();
        let mut val = serde_json::json!({ "summary": stats, "lines": lines });
        if args.has("markers") {
            val["markers"] = serde_json::to_value(markers::deletion_markers(lines.iter().copied()))?;
        }
        serde_json::to_writer_pretty(&mut *out, &val).context("writing diff json")?;
        writeln!(out)?;
        return Ok(());
    }

    if args.has("stat") {
        let stats: DiffStats = diff::diff_text(&old, &new).collect();
        write_stat(&stats, out)?;
        return Ok(());
    }

    let stats = render_diff(diff::diff_text(&old, &new), out).context("writing diff")?;
    tracing::info!(
        unchanged = stats.unchanged,
        removed = stats.removed,
        added = stats.added,
        identical = stats.is_identical(),
        "diff complete"
    );
    if args.has("markers") {
        for m in markers::deletion_markers(diff::diff_text(&old, &new)) {
            writeln!(out, "@ {} ({} removed)", m.anchor_line + 1, m.removed.len())?;
        }
    }
    Ok(())
}

/// One `<kind> <count>` line per kind, or `identical` when nothing changed.
fn write_stat<W: Write>(stats: &DiffStats, out: &mut W) -> io::Result<()> {
    if stats.is_identical() {
        return writeln!(out, "identical ({} lines)", stats.unchanged);
    }
    writeln!(out, "{} {}", DiffKind::Unchanged, stats.unchanged)?;
    writeln!(out, "{} {}", DiffKind::Removed, stats.removed)?;
    writeln!(out, "{} {}", DiffKind::Added, stats.added)
}

/// `diffseek files [roots..] [--full-paths] [--no-ignore] [--json]`
fn cmd_files<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let cfg = load_config(args)?;
    let roots = roots_from(args, 1)?;
    let walker = IgnoreWalker { respect_ignore_files: cfg.respect_ignore_files };
    let items = scan::enumerate_submenu_items(&roots, &walker, &cfg)?;

    if args.has("json") {
        serde_json::to_writer_pretty(&mut *out, &items).context("writing files json")?;
        writeln!(out)?;
    } else {
        for it in &items {
            writeln!(out, "{}\t{}", it.title, it.description)?;
        }
    }
    tracing::info!(count = items.len(), "files listed");
    Ok(())
}

/// `diffseek search <query> [roots..] [--limit=N] [--full-paths] [--json]`
fn cmd_search<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let query = args.pos(1).unwrap_or("");
    let cfg = load_config(args)?;
    let roots = roots_from(args, 2)?;
    let walker = IgnoreWalker { respect_ignore_files: cfg.respect_ignore_files };
    let items = scan::enumerate_submenu_items(&roots, &walker, &cfg)?;

    let hits = search_with(&items, query, &mut NucleoScorer::default(), cfg.max_results);
    if args.has("json") {
        serde_json::to_writer_pretty(&mut *out, &hits).context("writing search json")?;
        writeln!(out)?;
    } else {
        for it in &hits {
            writeln!(out, "{}\t{}", it.title, it.description)?;
        }
    }
    tracing::info!(query, candidates = items.len(), hits = hits.len(), "search complete");
    Ok(())
}

/// `diffseek show <path> [--root=DIR]`
fn cmd_show<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let path = args
        .pos(1)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("usage: diffseek show <path> [--root=DIR]"))?;
    let root = match args.value("root") {
        Some(r) => PathBuf::from(r),
        None => env::current_dir().context("failed to get current_dir")?,
    };
    let item = scan::file_context_item(&root, &path)?;
    if args.has("json") {
        serde_json::to_writer_pretty(&mut *out, &item).context("writing context json")?;
        writeln!(out)?;
    } else {
        writeln!(out, "{} ({})", item.name, item.description)?;
        writeln!(out, "{}", item.content)?;
    }
    Ok(())
}

fn print_help<W: Write>(out: &mut W) -> io::Result<()> {
    let here = util::get_dir_name().unwrap_or_else(|_| "workspace".into());
    writeln!(
        out,
r#"
diffseek: line diffs and file-picker search for {here}

USAGE:
    diffseek diff <old> <new> [--json] [--markers] [--stat]
                          # Stream a line diff (' ' same, '-' old, '+' new)
    diffseek files [ROOTS..] [--full-paths] [--no-ignore] [--json]
                          # List picker rows (title, description)
    diffseek search <QUERY> [ROOTS..] [--limit=N] [--full-paths] [--json]
                          # Rank files: word-prefix hits first, then fuzzy
    diffseek show <PATH> [--root=DIR] [--json]
                          # Print a file as a fenced context item
    diffseek help         # Show this message

GLOBAL:
    --config=PATH         # JSON config (default: ./.diffseek.json if present)
    -v, -vv               # More logging on stderr (RUST_LOG overrides)
"#
    )
}

/* ================================== Tests ================================== */

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn args(v: &[&str]) -> Args {
        Args::parse(v.iter().map(|s| s.to_string()))
    }

    #[test]
    fn parse_splits_flags_and_positionals() {
        let a = args(&["search", "foo", "--limit=5", "--json", "-v", "src"]);
        assert_eq!(a.positional, vec!["search", "foo", "src"]);
        assert_eq!(a.value("limit"), Some("5"));
        assert!(a.has("json"));
        assert_eq!(a.value("json"), None);
        assert_eq!(a.verbose, 1);
    }

    #[test]
    fn limit_must_be_positive_number() {
        assert_eq!(parse_limit(Some("12")), Some(12));
        assert_eq!(parse_limit(Some("0")), None);
        assert_eq!(parse_limit(Some("x")), None);
        assert_eq!(parse_limit(None), None);
    }

    #[test]
    fn diff_command_renders_text() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "a\nb\nc\n").unwrap();
        fs::write(&b, "a\nx\nc\n").unwrap();
        let a_s = a.to_string_lossy().to_string();
        let b_s = b.to_string_lossy().to_string();

        let mut buf = Vec::new();
        cmd_diff(&args(&["diff", a_s.as_str(), b_s.as_str()]), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), " a\n-b\n+x\n c\n");

        let mut buf = Vec::new();
        cmd_diff(&args(&["diff", a_s.as_str(), b_s.as_str(), "--json", "--markers"]), &mut buf).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(v["summary"]["removed"], 1);
        assert_eq!(v["lines"][1]["type"], "old");
        assert_eq!(v["markers"][0]["anchor_line"], 1);
    }

    #[test]
    fn diff_command_stat_summarizes_or_reports_identical() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "a\nb\nc\n").unwrap();
        fs::write(&b, "a\nx\nc\n").unwrap();
        let a_s = a.to_string_lossy().to_string();
        let b_s = b.to_string_lossy().to_string();

        let mut buf = Vec::new();
        cmd_diff(&args(&["diff", a_s.as_str(), b_s.as_str(), "--stat"]), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "same 2\nold 1\nnew 1\n");

        let mut buf = Vec::new();
        cmd_diff(&args(&["diff", a_s.as_str(), a_s.as_str(), "--stat"]), &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "identical (3 lines)\n");
    }

    #[test]
    fn diff_command_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt").to_string_lossy().to_string();
        let mut buf = Vec::new();
        let err = cmd_diff(&args(&["diff", missing.as_str(), missing.as_str()]), &mut buf).unwrap_err();
        assert!(format!("{err:#}").contains("nope.txt"));
    }

    #[test]
    fn search_command_ranks_word_prefix_first() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for f in ["other.ts", "test.ts", "testing.ts"] {
            fs::write(root.join(f), "x").unwrap();
        }
        let root_s = root.to_string_lossy().to_string();
        let mut buf = Vec::new();
        cmd_search(&args(&["search", "test", root_s.as_str(), "--json"]), &mut buf).unwrap();
        let v: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let titles: Vec<_> = v.as_array().unwrap().iter().map(|i| i["title"].as_str().unwrap()).collect();
        assert_eq!(&titles[..2], &["test.ts", "testing.ts"]);
    }
}
