use crate::fence;

/// Classification of a [`Segment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Lines belonging to a fenced code block, delimiter lines included.
    Fenced {
        /// Language tag declared on the opening fence (may be empty).
        lang: String,
        /// Backtick run length of the opening fence.
        open_run: usize,
        /// False when the fence was still open at end of input.
        closed: bool,
    },
    /// Ordinary markdown outside any fence.
    Processable,
}

/// A maximal run of contiguous lines with uniform classification.
///
/// Segments partition the document exactly: concatenating their lines in
/// order reproduces the input, and consecutive segments always differ in
/// classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    /// 1-indexed line number of the segment's first line.
    pub start_line: usize,
    pub lines: Vec<String>,
}

impl Segment {
    pub fn is_fenced(&self) -> bool {
        matches!(self.kind, SegmentKind::Fenced { .. })
    }
}

/// Split `lines` into alternating fenced/processable segments.
///
/// A line whose stripped form starts with three or more backticks opens a
/// fence; while inside one, only a bare all-backtick line at least as long
/// as the opening run closes it (tagged or shorter fence lines stay
/// interior). An unterminated fence yields one final fenced segment with
/// `closed: false` rather than an error.
pub fn scan(lines: &[String]) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    // Open run of the fence we are currently inside, if any.
    let mut open: Option<usize> = None;

    for (idx, line) in lines.iter().enumerate() {
        let lineno = idx + 1;
        match open {
            None => {
                if let Some(s) = fence::sig(line) {
                    segments.push(Segment {
                        kind: SegmentKind::Fenced {
                            lang: s.lang().to_string(),
                            open_run: s.run,
                            closed: false,
                        },
                        start_line: lineno,
                        lines: vec![line.clone()],
                    });
                    open = Some(s.run);
                } else {
                    match segments.last_mut() {
                        Some(seg) if !seg.is_fenced() => seg.lines.push(line.clone()),
                        _ => segments.push(Segment {
                            kind: SegmentKind::Processable,
                            start_line: lineno,
                            lines: vec![line.clone()],
                        }),
                    }
                }
            }
            Some(open_run) => {
                let seg = segments.last_mut().expect("open fence has a segment");
                seg.lines.push(line.clone());
                if fence::sig(line).is_some_and(|s| s.closes(open_run)) {
                    if let SegmentKind::Fenced { closed, .. } = &mut seg.kind {
                        *closed = true;
                    }
                    open = None;
                }
            }
        }
    }

    segments
}
