//! Line filtering module
//!
//! Decides, line by line, whether a dump line is written to the cleaned output.
//! Two rules apply in order: the section skipper suppresses generated
//! trigger/view blocks, then the line filter removes lines by literal prefix.

use bstr::ByteSlice;

/// Line prefix opening a generated block (MySQL versioned trigger definition)
pub const SKIP_START_MARKER: &str = "/*!50003 CREATE*/ /*!50017";

/// Line prefix closing a generated block
pub const SKIP_END_MARKER: &str = "END */;;";

/// Prefix-based line filter
#[derive(Debug, Clone, Default)]
pub struct LineFilter {
    prefixes: Vec<Vec<u8>>,
}

impl LineFilter {
    /// Create a filter from the configured remove list
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        Self {
            prefixes: prefixes.into_iter().map(|p| p.as_ref().to_vec()).collect(),
        }
    }

    /// Index of the first configured prefix the line starts with
    #[inline]
    pub fn matching_prefix(&self, line: &[u8]) -> Option<usize> {
        self.prefixes.iter().position(|p| line.starts_with(p))
    }

    /// Check if the line must be removed
    #[inline]
    pub fn should_remove(&self, line: &[u8]) -> bool {
        self.matching_prefix(line).is_some()
    }
}

/// Position relative to a generated block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkipState {
    #[default]
    Outside,
    Inside,
}

/// Tracks generated blocks for a single file.
///
/// The line opening a block is emitted; every following line up to and
/// including the closing line is suppressed. An unterminated block suppresses
/// the rest of the file.
#[derive(Debug, Clone)]
pub struct SectionSkipper {
    start: &'static [u8],
    end: &'static [u8],
    state: SkipState,
    blocks: u64,
}

impl SectionSkipper {
    pub fn new() -> Self {
        Self::with_markers(SKIP_START_MARKER, SKIP_END_MARKER)
    }

    pub fn with_markers(start: &'static str, end: &'static str) -> Self {
        Self {
            start: start.as_bytes(),
            end: end.as_bytes(),
            state: SkipState::Outside,
            blocks: 0,
        }
    }

    /// Feed one line; returns true if the line is suppressed
    pub fn skip(&mut self, line: &[u8]) -> bool {
        let entered = self.state == SkipState::Outside && line.starts_with(self.start);
        if entered {
            self.state = SkipState::Inside;
            self.blocks += 1;
            log::trace!("skip block opened: {}", line.trim_end().as_bstr());
        }

        if self.state == SkipState::Inside && line.starts_with(self.end) {
            self.state = SkipState::Outside;
            return true;
        }

        self.state == SkipState::Inside && !entered
    }

    pub fn state(&self) -> SkipState {
        self.state
    }

    /// Number of blocks opened so far
    pub fn blocks(&self) -> u64 {
        self.blocks
    }
}

impl Default for SectionSkipper {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome for a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDecision {
    /// Written to the output
    Keep,
    /// Suppressed by a generated block
    Skipped,
    /// Matched a remove prefix
    Removed,
}

/// Per-file line processor: section skipper first, then prefix filter
#[derive(Debug)]
pub struct LineProcessor<'a> {
    skipper: SectionSkipper,
    filter: &'a LineFilter,
}

impl<'a> LineProcessor<'a> {
    pub fn new(filter: &'a LineFilter) -> Self {
        Self::with_skipper(filter, SectionSkipper::new())
    }

    pub fn with_skipper(filter: &'a LineFilter, skipper: SectionSkipper) -> Self {
        Self { skipper, filter }
    }

    #[inline]
    pub fn decide(&mut self, line: &[u8]) -> LineDecision {
        if self.skipper.skip(line) {
            LineDecision::Skipped
        } else if self.filter.should_remove(line) {
            LineDecision::Removed
        } else {
            LineDecision::Keep
        }
    }

    pub fn skipper(&self) -> &SectionSkipper {
        &self.skipper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(lines: &[&str], filter: &LineFilter) -> Vec<String> {
        let mut processor = LineProcessor::new(filter);
        lines
            .iter()
            .filter(|l| processor.decide(l.as_bytes()) == LineDecision::Keep)
            .map(|l| l.to_string())
            .collect()
    }

    #[test]
    fn test_line_filter_prefixes() {
        let filter = LineFilter::new(["-- ", "LOCK TABLES"]);

        assert!(filter.should_remove(b"-- drop me\n"));
        assert!(filter.should_remove(b"LOCK TABLES `t` WRITE;\n"));
        assert!(!filter.should_remove(b"INSERT INTO t VALUES (1);\n"));
        assert!(!filter.should_remove(b" -- indented\n"));
    }

    #[test]
    fn test_line_filter_case_sensitive() {
        let filter = LineFilter::new(["LOCK"]);
        assert!(!filter.should_remove(b"lock tables\n"));
    }

    #[test]
    fn test_line_filter_first_match_wins() {
        let filter = LineFilter::new(["--", "-- "]);
        assert_eq!(filter.matching_prefix(b"-- x"), Some(0));

        let reversed = LineFilter::new(["-- ", "--"]);
        assert_eq!(reversed.matching_prefix(b"-- x"), Some(0));
        assert_eq!(reversed.matching_prefix(b"--x"), Some(1));
    }

    #[test]
    fn test_line_filter_order_independent() {
        let lines = ["-- a", "/* b", "c", "--d", ""];
        let a = LineFilter::new(["--", "/*"]);
        let b = LineFilter::new(["/*", "--"]);
        for line in lines {
            assert_eq!(a.should_remove(line.as_bytes()), b.should_remove(line.as_bytes()));
        }
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = LineFilter::default();
        assert!(!filter.should_remove(b"-- anything"));
        assert!(!filter.should_remove(b""));
    }

    #[test]
    fn test_remove_comment_lines() {
        let filter = LineFilter::new(["-- "]);
        let out = run(&["keep this\n", "-- drop me\n", "also keep\n"], &filter);
        assert_eq!(out, vec!["keep this\n", "also keep\n"]);
    }

    #[test]
    fn test_skip_generated_block() {
        let filter = LineFilter::default();
        let out = run(
            &[
                "before\n",
                "/*!50003 CREATE*/ /*!50017 ...\n",
                "garbage1\n",
                "garbage2\n",
                "END */;;\n",
                "after\n",
            ],
            &filter,
        );
        assert_eq!(
            out,
            vec!["before\n", "/*!50003 CREATE*/ /*!50017 ...\n", "after\n"]
        );
    }

    #[test]
    fn test_end_marker_outside_block_is_kept() {
        let filter = LineFilter::default();
        let out = run(&["END */;;\n", "x\n"], &filter);
        assert_eq!(out, vec!["END */;;\n", "x\n"]);
    }

    #[test]
    fn test_unterminated_block_drops_rest() {
        let mut skipper = SectionSkipper::new();
        assert!(!skipper.skip(b"a\n"));
        assert!(!skipper.skip(b"/*!50003 CREATE*/ /*!50017 x\n"));
        assert!(skipper.skip(b"b\n"));
        assert!(skipper.skip(b"c"));
        assert_eq!(skipper.state(), SkipState::Inside);
    }

    #[test]
    fn test_start_marker_inside_block_is_skipped() {
        let mut skipper = SectionSkipper::new();
        assert!(!skipper.skip(b"/*!50003 CREATE*/ /*!50017 one\n"));
        assert!(skipper.skip(b"/*!50003 CREATE*/ /*!50017 two\n"));
        assert!(skipper.skip(b"END */;;\n"));
        assert_eq!(skipper.state(), SkipState::Outside);
        assert_eq!(skipper.blocks(), 1);
    }

    #[test]
    fn test_block_then_prefix_filter() {
        let filter = LineFilter::new(["/*!50003"]);
        let mut processor = LineProcessor::new(&filter);

        // the opening line escapes the skipper but still meets the prefix filter
        assert_eq!(
            processor.decide(b"/*!50003 CREATE*/ /*!50017 DEFINER*/\n"),
            LineDecision::Removed
        );
        assert_eq!(processor.decide(b"BEGIN\n"), LineDecision::Skipped);
        assert_eq!(processor.decide(b"END */;;\n"), LineDecision::Skipped);
        assert_eq!(processor.decide(b"ok\n"), LineDecision::Keep);
    }

    #[test]
    fn test_custom_markers() {
        let filter = LineFilter::default();
        let skipper = SectionSkipper::with_markers("BEGIN", "END");
        let mut processor = LineProcessor::with_skipper(&filter, skipper);

        let decisions: Vec<_> = ["x", "BEGIN", "y", "END", "z"]
            .iter()
            .map(|l| processor.decide(l.as_bytes()))
            .collect();
        assert_eq!(
            decisions,
            vec![
                LineDecision::Keep,
                LineDecision::Keep,
                LineDecision::Skipped,
                LineDecision::Skipped,
                LineDecision::Keep,
            ]
        );
    }
}
