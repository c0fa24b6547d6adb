use crate::nest::{self, FenceNote};
use crate::segment::{self, SegmentKind};
use crate::{escape, linefix};

/// Output of the composed pass: the rewritten lines plus any diagnostics
/// worth surfacing. The engine itself never fails; whether a note is an
/// error is the caller's policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessReport {
    pub lines: Vec<String>,
    pub notes: Vec<FenceNote>,
}

impl ProcessReport {
    pub fn has_notes(&self) -> bool {
        !self.notes.is_empty()
    }
}

/// Run the full normalization pass and collect diagnostics.
///
/// Nesting resolution runs first over the whole document (it needs raw
/// fence lines and cross-line lookahead); the result is segmented, and the
/// inline escaper plus the line fixer run over processable segments only.
/// Fenced content, delimiters included, passes through untouched.
pub fn process_lines_report(lines: &[String]) -> ProcessReport {
    let nested = nest::resolve(lines);
    let mut notes = nested.notes;

    let mut out = Vec::with_capacity(nested.lines.len());
    for seg in segment::scan(&nested.lines) {
        match seg.kind {
            SegmentKind::Fenced { closed, .. } => {
                if !closed {
                    notes.push(FenceNote::UnterminatedFence {
                        line: seg.start_line,
                    });
                }
                out.extend(seg.lines);
            }
            SegmentKind::Processable => {
                let escaped: Vec<String> =
                    seg.lines.iter().map(|l| escape::escape_line(l)).collect();
                out.extend(linefix::fix_lines(&escaped));
            }
        }
    }

    ProcessReport { lines: out, notes }
}

/// The note-discarding convenience form of [`process_lines_report`].
pub fn process_lines(lines: &[String]) -> Vec<String> {
    process_lines_report(lines).lines
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn doc(text: &str) -> Vec<String> {
        text.split_inclusive('\n').map(str::to_string).collect()
    }

    fn run(text: &str) -> String {
        process_lines(&doc(text)).concat()
    }

    #[test]
    fn full_pass_composes_all_stages() {
        let input = "Output: ```markdown\n\
                     ```markdown\n\
                     ```python\n\
                     print(1)\n\
                     ```\n\
                     ```\n\
                     the __init__ method\n";
        let expected = "Output: `` ```markdown ``\n\
                        ````markdown\n\
                        ```python\n\
                        print(1)\n\
                        ```\n\
                        ````\n\
                        the `__init__` method\n";
        assert_eq!(run(input), expected);
    }

    #[test]
    fn fenced_content_is_never_touched() {
        let input = "```python\nOutput: ```markdown\nthe __init__ method\n```\n";
        assert_eq!(run(input), input);
    }

    #[test]
    fn unterminated_fence_is_reported_not_fixed() {
        let input = doc("fine\n```rust\nno close\n");
        let report = process_lines_report(&input);
        assert_eq!(report.lines, input);
        assert_eq!(report.notes, vec![FenceNote::UnterminatedFence { line: 2 }]);
    }

    #[test]
    fn inner_fence_in_non_markdown_block_is_reported() {
        let input = doc("```text\n```python\nx\n```\n```\n");
        let report = process_lines_report(&input);
        assert_eq!(report.lines, input);
        // The block is reported and left alone; its trailing delimiter then
        // reads as a second, unterminated fence, which is reported too.
        assert_eq!(
            report.notes,
            vec![
                FenceNote::InnerFenceOutsideMarkdown {
                    line: 1,
                    lang: "text".to_string(),
                },
                FenceNote::UnterminatedFence { line: 5 },
            ]
        );
    }

    #[test]
    fn clean_document_reports_nothing() {
        let input = doc("# Title\n\nprose\n\n```rust\nfn main() {}\n```\n");
        let report = process_lines_report(&input);
        assert_eq!(report.lines, input);
        assert!(!report.has_notes());
    }

    #[test]
    fn process_lines_is_idempotent() {
        let input = doc(
            "Output: ```markdown\n\
             ```markdown\n\
             ```python\n\
             x\n\
             ```\n\
             ```\n\
             **A:** one\n\
             **B:** two\n\
             1. use __init__\n",
        );
        let once = process_lines(&input);
        let twice = process_lines(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn final_line_without_terminator_is_preserved() {
        let input = doc("prose\nlast line no newline");
        let out = process_lines(&input);
        assert_eq!(out.concat(), "prose\nlast line no newline");
    }
}
