/// Minimum backtick run length for a fence delimiter.
pub const MIN_RUN: usize = 3;

/// Local facts about a fence delimiter line.
///
/// A line is a fence delimiter when its stripped form starts with three or
/// more backticks. Everything after the run is kept verbatim in `tail`; the
/// language tag, when present, is the leading alphanumeric token of the tail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceSig {
    /// Number of leading backticks in the stripped line.
    pub run: usize,
    /// Stripped content after the backtick run (empty for a bare fence).
    pub tail: String,
}

impl FenceSig {
    /// A closing delimiter: backticks only, no tag.
    pub fn is_bare(&self) -> bool {
        self.tail.is_empty()
    }

    /// Exactly three backticks and nothing else.
    pub fn is_bare_triple(&self) -> bool {
        self.run == MIN_RUN && self.is_bare()
    }

    /// Total stripped length (backticks plus tail).
    pub fn stripped_len(&self) -> usize {
        self.run + self.tail.len()
    }

    /// Leading alphanumeric token of the tail, i.e. the declared language.
    pub fn lang(&self) -> &str {
        let end = self
            .tail
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(self.tail.len());
        &self.tail[..end]
    }

    /// Whether a line with this signature closes a fence opened with
    /// `open_run` backticks: exactly backticks, at least as many.
    pub fn closes(&self, open_run: usize) -> bool {
        self.is_bare() && self.run >= open_run
    }
}

/// Classify `line` as a fence delimiter, if it is one.
pub fn sig(line: &str) -> Option<FenceSig> {
    let t = line.trim();
    let run = t.chars().take_while(|&c| c == '`').count();
    if run < MIN_RUN {
        return None;
    }
    Some(FenceSig {
        run,
        tail: t[run..].to_string(),
    })
}

/// Whether `line` is a fence delimiter line.
pub fn is_fence_line(line: &str) -> bool {
    sig(line).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_tagged_fence() {
        let s = sig("```rust\n").unwrap();
        assert_eq!(s.run, 3);
        assert_eq!(s.lang(), "rust");
        assert!(!s.is_bare());
    }

    #[test]
    fn detects_bare_fence() {
        let s = sig("```\n").unwrap();
        assert!(s.is_bare_triple());
    }

    #[test]
    fn detects_long_fence() {
        let s = sig("````markdown\n").unwrap();
        assert_eq!(s.run, 4);
        assert_eq!(s.lang(), "markdown");
    }

    #[test]
    fn ignores_short_runs_and_prose() {
        assert!(sig("``not a fence\n").is_none());
        assert!(sig("plain text\n").is_none());
        assert!(sig("Output: ```markdown\n").is_none());
    }

    #[test]
    fn tolerates_leading_whitespace() {
        let s = sig("  ```python\n").unwrap();
        assert_eq!(s.lang(), "python");
    }

    #[test]
    fn lang_stops_at_non_alphanumeric() {
        let s = sig("```python title=demo\n").unwrap();
        assert_eq!(s.lang(), "python");
    }

    #[test]
    fn close_requires_equal_or_longer_bare_run() {
        let close = sig("```\n").unwrap();
        assert!(close.closes(3));
        assert!(!close.closes(4));
        let tagged = sig("```rust\n").unwrap();
        assert!(!tagged.closes(3));
    }
}
