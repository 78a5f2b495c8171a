// diffseek/src/diff.rs
//! Streaming line diff between an original and a modified file.
//!
//! Three passes, all linear:
//! - common prefix, emitted as it is walked
//! - common suffix, measured (not emitted) once the prefix ends
//! - lockstep walk over the middle: equal lines stay, unequal lines pair up
//!   as `Removed` then `Added`, leftovers drain as all-`Removed` / all-`Added`
//!
//! Then the suffix is emitted. The middle walk never searches for a
//! realignment point: when a region is shifted and the two sides share no
//! common tail, every line of the shifted region comes out as a
//! `Removed`/`Added` pair. Fixtures depend on that pairing; do not swap in
//! an LCS.
//!
//! Lines are compared after `trim_end()`. A line that only differs in
//! trailing whitespace comes out as `Unchanged` and its emitted text is the
//! trimmed form; callers that need the raw bytes should index back into their
//! own input.

use std::iter::FusedIterator;

use crate::diff_line::DiffLine;

/// Strip trailing whitespace (including a stray `\r`).
#[inline]
pub fn normalize_line(line: &str) -> &str {
    line.trim_end()
}

/// Diff two whole-file texts. Splits with `str::lines`, so an empty string
/// is zero lines and a final newline does not add an empty last line.
pub fn diff_text<'a>(original: &'a str, modified: &'a str) -> DiffLines<'a, &'a str> {
    DiffLines::owned(original.lines().collect(), modified.lines().collect())
}

/// Diff two pre-split line sequences.
pub fn diff_lines<'a, S: AsRef<str>>(original: &'a [S], modified: &'a [S]) -> DiffLines<'a, S> {
    DiffLines::new(Lines::Borrowed(original), Lines::Borrowed(modified))
}

/* ============================== Iterator ============================== */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Prefix,
    Middle,
    Suffix,
    Done,
}

/// Line storage: borrowed from the caller, or split out of a `&'a str`.
#[derive(Clone, Debug)]
enum Lines<'a, S> {
    Borrowed(&'a [S]),
    Split(Vec<&'a str>),
}

impl<'a, S: AsRef<str>> Lines<'a, S> {
    fn len(&self) -> usize {
        match self {
            Lines::Borrowed(v) => v.len(),
            Lines::Split(v) => v.len(),
        }
    }

    fn get(&self, i: usize) -> &'a str {
        match self {
            Lines::Borrowed(v) => {
                let v: &'a [S] = *v;
                normalize_line(v[i].as_ref())
            }
            Lines::Split(v) => normalize_line(v[i]),
        }
    }
}

/// Lazy diff sequence. Nothing past the element being returned is computed,
/// so dropping the iterator early skips the rest of the work.
#[derive(Clone, Debug)]
pub struct DiffLines<'a, S> {
    old: Lines<'a, S>,
    new: Lines<'a, S>,
    oi: usize,
    ni: usize,
    // Exclusive ends of the unresolved middle; set when the prefix pass ends.
    old_end: usize,
    new_end: usize,
    phase: Phase,
    // Second half of a paired substitution.
    pending: Option<DiffLine<'a>>,
}

impl<'a> DiffLines<'a, &'a str> {
    fn owned(old: Vec<&'a str>, new: Vec<&'a str>) -> Self {
        DiffLines::new(Lines::Split(old), Lines::Split(new))
    }
}

impl<'a, S: AsRef<str>> DiffLines<'a, S> {
    fn new(old: Lines<'a, S>, new: Lines<'a, S>) -> Self {
        let (old_end, new_end) = (old.len(), new.len());
        Self { old, new, oi: 0, ni: 0, old_end, new_end, phase: Phase::Prefix, pending: None }
    }

    /// Shrink the middle window from the back while both sides agree.
    /// Never crosses the cursors left by the prefix pass.
    fn measure_suffix(&mut self) {
        self.old_end = self.old.len();
        self.new_end = self.new.len();
        while self.old_end > self.oi
            && self.new_end > self.ni
            && self.old.get(self.old_end - 1) == self.new.get(self.new_end - 1)
        {
            self.old_end -= 1;
            self.new_end -= 1;
        }
    }

    fn step_prefix(&mut self) -> Option<DiffLine<'a>> {
        if self.oi < self.old.len() && self.ni < self.new.len() {
            let (a, b) = (self.old.get(self.oi), self.new.get(self.ni));
            if a == b {
                self.oi += 1;
                self.ni += 1;
                return Some(DiffLine::unchanged(a));
            }
        }
        self.measure_suffix();
        self.phase = Phase::Middle;
        None
    }

    fn step_middle(&mut self) -> Option<DiffLine<'a>> {
        let old_left = self.oi < self.old_end;
        let new_left = self.ni < self.new_end;
        match (old_left, new_left) {
            (false, false) => {
                self.phase = Phase::Suffix;
                None
            }
            (false, true) => {
                let b = self.new.get(self.ni);
                self.ni += 1;
                Some(DiffLine::added(b))
            }
            (true, false) => {
                let a = self.old.get(self.oi);
                self.oi += 1;
                Some(DiffLine::removed(a))
            }
            (true, true) => {
                let (a, b) = (self.old.get(self.oi), self.new.get(self.ni));
                self.oi += 1;
                self.ni += 1;
                if a == b {
                    Some(DiffLine::unchanged(a))
                } else {
                    self.pending = Some(DiffLine::added(b));
                    Some(DiffLine::removed(a))
                }
            }
        }
    }

    fn step_suffix(&mut self) -> Option<DiffLine<'a>> {
        if self.oi < self.old.len() {
            let a = self.old.get(self.oi);
            self.oi += 1;
            self.ni += 1;
            Some(DiffLine::unchanged(a))
        } else {
            self.phase = Phase::Done;
            None
        }
    }
}

impl<'a, S: AsRef<str>> Iterator for DiffLines<'a, S> {
    type Item = DiffLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(line) = self.pending.take() {
            return Some(line);
        }
        loop {
            let out = match self.phase {
                Phase::Prefix => self.step_prefix(),
                Phase::Middle => self.step_middle(),
                Phase::Suffix => self.step_suffix(),
                Phase::Done => return None,
            };
            if out.is_some() {
                return out;
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.phase == Phase::Done {
            return (0, Some(0));
        }
        // Every record consumes one line from at least one side and at most
        // one from each; the pending record has already consumed its line.
        let rem_old = self.old.len() - self.oi;
        let rem_new = self.new.len() - self.ni;
        let extra = usize::from(self.pending.is_some());
        (rem_old.max(rem_new) + extra, Some(rem_old + rem_new + extra))
    }
}

impl<S: AsRef<str>> FusedIterator for DiffLines<'_, S> {}

/* ================================== Tests ================================== */

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff_line::{modified_lines, original_lines, DiffKind, DiffStats};
    use pretty_assertions::assert_eq;
    use DiffKind::{Added as A, Removed as R, Unchanged as U};

    fn run<'a>(old: &'a [&'a str], new: &'a [&'a str]) -> Vec<(DiffKind, &'a str)> {
        diff_lines(old, new).map(|l| (l.kind, l.text)).collect()
    }

    #[test]
    fn single_substitution_in_the_middle() {
        assert_eq!(
            run(&["a", "b", "c"], &["a", "x", "c"]),
            vec![(U, "a"), (R, "b"), (A, "x"), (U, "c")]
        );
    }

    #[test]
    fn append_at_end() {
        assert_eq!(run(&["a", "b"], &["a", "b", "c"]), vec![(U, "a"), (U, "b"), (A, "c")]);
    }

    #[test]
    fn empty_original_is_all_added() {
        assert_eq!(run(&[], &["a"]), vec![(A, "a")]);
    }

    #[test]
    fn empty_modified_is_all_removed() {
        assert_eq!(run(&["a", "b"], &[]), vec![(R, "a"), (R, "b")]);
    }

    #[test]
    fn both_empty_yields_nothing() {
        assert!(run(&[], &[]).is_empty());
    }

    #[test]
    fn identical_inputs_are_all_unchanged() {
        let x = ["fn main() {", "    println!(\"hi\");", "}"];
        let out = run(&x, &x);
        assert!(out.iter().all(|(k, _)| *k == U));
        assert_eq!(out.iter().map(|(_, t)| *t).collect::<Vec<_>>(), x.to_vec());
    }

    #[test]
    fn trailing_whitespace_is_ignored_and_trimmed() {
        assert_eq!(run(&["a  ", "b\t"], &["a", "b"]), vec![(U, "a"), (U, "b")]);
        assert_eq!(run(&["a\r"], &["a"]), vec![(U, "a")]);
    }

    #[test]
    fn insertion_with_shared_tail_is_a_single_add() {
        assert_eq!(
            run(&["a", "b", "c", "z"], &["a", "new", "b", "c", "z"]),
            vec![(U, "a"), (A, "new"), (U, "b"), (U, "c"), (U, "z")]
        );
    }

    #[test]
    fn shift_without_shared_tail_pairs_instead_of_realigning() {
        // An LCS would keep "a" and "b"; lockstep pairing reports every line.
        assert_eq!(
            run(&["a", "b", "c"], &["x", "a", "b"]),
            vec![(R, "a"), (A, "x"), (R, "b"), (A, "a"), (R, "c"), (A, "b")]
        );
    }

    #[test]
    fn equal_lines_inside_middle_stay_unchanged() {
        assert_eq!(
            run(&["p", "1", "k", "2", "s"], &["p", "x", "k", "y", "s"]),
            vec![(U, "p"), (R, "1"), (A, "x"), (U, "k"), (R, "2"), (A, "y"), (U, "s")]
        );
    }

    #[test]
    fn suffix_never_overlaps_prefix() {
        // Every line of `old` is a prefix match; the suffix scan must not
        // reuse any of them.
        assert_eq!(run(&["a", "a"], &["a", "a", "a"]), vec![(U, "a"), (U, "a"), (A, "a")]);
        assert_eq!(run(&["a", "a", "a"], &["a"]), vec![(U, "a"), (R, "a"), (R, "a")]);
    }

    #[test]
    fn prefix_and_suffix_regions_come_first_and_last() {
        let old = ["h1", "h2", "m1", "m2", "t1", "t2", "t3"];
        let new = ["h1", "h2", "n1", "t1", "t2", "t3"];
        let out = run(&old, &new);
        assert_eq!(&out[..2], &[(U, "h1"), (U, "h2")]);
        assert_eq!(&out[out.len() - 3..], &[(U, "t1"), (U, "t2"), (U, "t3")]);
        assert_eq!(&out[2..out.len() - 3], &[(R, "m1"), (A, "n1"), (R, "m2")]);
    }

    #[test]
    fn round_trip_and_length_properties() {
        let cases: &[(&[&str], &[&str])] = &[
            (&["a", "b", "c"], &["c", "b", "a"]),
            (&["x"], &["y", "z", "x"]),
            (&["1", "2", "3", "4"], &["1", "4"]),
            (&["", "", "a"], &["a", "", ""]),
            (&["same"], &["same"]),
            (&[], &["only", "new"]),
        ];
        for (old, new) in cases {
            let diff: Vec<_> = diff_lines(old, new).collect();
            assert_eq!(original_lines(diff.iter().copied()), old.to_vec());
            assert_eq!(modified_lines(diff.iter().copied()), new.to_vec());
            let stats: DiffStats = diff.iter().copied().collect();
            assert_eq!(stats.original_len(), old.len());
            assert_eq!(stats.modified_len(), new.len());
        }
    }

    #[test]
    fn removed_and_added_keep_their_relative_order() {
        let old = ["k", "r1", "r2", "r3"];
        let new = ["k", "a1", "a2"];
        let diff: Vec<_> = diff_lines(&old, &new).collect();
        let removed: Vec<_> = diff.iter().filter(|l| l.kind == R).map(|l| l.text).collect();
        let added: Vec<_> = diff.iter().filter(|l| l.kind == A).map(|l| l.text).collect();
        assert_eq!(removed, vec!["r1", "r2", "r3"]);
        assert_eq!(added, vec!["a1", "a2"]);
    }

    #[test]
    fn diff_text_splits_on_lines() {
        let out: Vec<_> = diff_text("a\nb\nc\n", "a\r\nx\r\nc\r\n").map(|l| (l.kind, l.text)).collect();
        assert_eq!(out, vec![(U, "a"), (R, "b"), (A, "x"), (U, "c")]);
        assert_eq!(diff_text("", "a").map(|l| l.kind).collect::<Vec<_>>(), vec![A]);
        assert_eq!(diff_text("", "").count(), 0);
    }

    #[test]
    fn works_with_owned_strings() {
        let old = vec![String::from("a"), String::from("b ")];
        let new = vec![String::from("a"), String::from("c")];
        let out: Vec<_> = diff_lines(&old, &new).map(|l| (l.kind, l.text)).collect();
        assert_eq!(out, vec![(U, "a"), (R, "b"), (A, "c")]);
    }

    #[test]
    fn consumer_can_stop_early() {
        let old: Vec<String> = (0..10_000).map(|i| i.to_string()).collect();
        let new: Vec<String> = (0..10_000).map(|i| format!("{i}!")).collect();
        let mut it = diff_lines(&old, &new);
        let first: Vec<_> = it.by_ref().take(2).collect();
        assert_eq!(first, vec![DiffLine::removed("0"), DiffLine::added("0!")]);
        drop(it);
    }

    #[test]
    fn size_hint_brackets_the_real_length() {
        let old = ["a", "b", "c", "d"];
        let new = ["a", "x", "y"];
        let mut it = diff_lines(&old, &new);
        loop {
            let (lo, hi) = it.size_hint();
            let rest = it.clone().count();
            assert!(lo <= rest && rest <= hi.unwrap(), "{lo} <= {rest} <= {hi:?}");
            if it.next().is_none() {
                break;
            }
        }
        assert_eq!(it.size_hint(), (0, Some(0)));
        assert!(it.next().is_none());
    }
}
