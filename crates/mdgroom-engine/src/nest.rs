use std::fmt;

use crate::fence;

/// Non-fatal diagnostics collected while normalizing a document.
///
/// The engine never fails on malformed fence structure; it degrades to
/// pass-through and reports what it saw. Escalation is caller policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenceNote {
    /// A fence was opened but never closed.
    UnterminatedFence { line: usize },
    /// An inner fence was found inside a block whose tag is not a markdown
    /// variant. Only markdown blocks are rewritten, so the block was left
    /// alone.
    InnerFenceOutsideMarkdown { line: usize, lang: String },
}

impl fmt::Display for FenceNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FenceNote::UnterminatedFence { line } => {
                write!(f, "unterminated fence opened at line {line}")
            }
            FenceNote::InnerFenceOutsideMarkdown { line, lang } => {
                write!(
                    f,
                    "inner fence inside `{lang}` block opened at line {line}; \
                     only markdown blocks are rewritten"
                )
            }
        }
    }
}

/// What a bare ``` line at nesting depth zero turns out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BareFenceRole {
    /// A later bare fence will close it: this one opens an inner block.
    InnerOpen,
    /// This is the true closing delimiter of the outer block.
    OuterClose,
    /// Nothing decisive follows before end of input.
    Unterminated,
}

/// Decide whether a bare fence line is an inner opener or the outer close,
/// by scanning the lines after it: another bare fence seen before the next
/// tagged opening fence means the current line opened an inner block.
pub fn bare_fence_role(rest: &[String]) -> BareFenceRole {
    for line in rest {
        if let Some(s) = fence::sig(line) {
            if s.is_bare_triple() {
                return BareFenceRole::InnerOpen;
            }
            if s.stripped_len() > fence::MIN_RUN {
                return BareFenceRole::OuterClose;
            }
        }
    }
    BareFenceRole::Unterminated
}

/// Result of the nesting pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NestOutcome {
    pub lines: Vec<String>,
    pub notes: Vec<FenceNote>,
}

fn is_markdown_lang(lang: &str) -> bool {
    matches!(lang, "markdown" | "md")
}

/// Lengthen a fence delimiter by one backtick, preserving indentation and
/// the language tag.
fn upgrade(line: &str) -> String {
    match line.find('`') {
        Some(pos) => {
            let mut s = String::with_capacity(line.len() + 1);
            s.push_str(&line[..pos]);
            s.push('`');
            s.push_str(&line[pos..]);
            s
        }
        None => line.to_string(),
    }
}

/// Resolve ambiguous fence nesting across the whole document.
///
/// A markdown-tagged block whose body contains fences of the same 3-backtick
/// run as its own delimiters is ambiguous: a later parser cannot tell an
/// inner opener from the outer close. This pass finds such blocks and
/// lengthens the outer delimiters to 4 backticks, leaving the body
/// untouched, so the outer fence always outruns anything inside it.
///
/// Blocks with any other tag are never rewritten; when one turns out to
/// contain an inner fence it is reported as a [`FenceNote`] instead. A block
/// whose close is never found is passed through verbatim.
///
/// Known limit: the upgrade targets exactly 4 backticks. A body that itself
/// uses a 4-backtick fence is not escalated further.
pub fn resolve(lines: &[String]) -> NestOutcome {
    let mut out = Vec::with_capacity(lines.len());
    let mut notes = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = &lines[i];
        // Only a tagged fence starts a nestable block.
        let open = fence::sig(line).filter(|s| s.stripped_len() > fence::MIN_RUN);
        let Some(open) = open else {
            out.push(line.clone());
            i += 1;
            continue;
        };

        // Collect the block body, tracking inner fence depth.
        let mut depth = 0usize;
        let mut has_inner = false;
        let mut body: Vec<&String> = Vec::new();
        let mut close_at: Option<usize> = None;
        let mut j = i + 1;
        while j < lines.len() {
            if let Some(s) = fence::sig(&lines[j]) {
                if s.stripped_len() > fence::MIN_RUN {
                    depth += 1;
                    has_inner = true;
                } else if depth > 0 {
                    depth -= 1;
                    has_inner = true;
                } else {
                    match bare_fence_role(&lines[j + 1..]) {
                        BareFenceRole::InnerOpen => {
                            depth += 1;
                            has_inner = true;
                        }
                        BareFenceRole::OuterClose | BareFenceRole::Unterminated => {
                            close_at = Some(j);
                            break;
                        }
                    }
                }
            }
            body.push(&lines[j]);
            j += 1;
        }

        // Fallback: a multi-line body containing any fence line counts.
        if body.len() > 1 && body.iter().any(|l| fence::is_fence_line(l)) {
            has_inner = true;
        }

        match close_at {
            Some(c) => {
                if has_inner && is_markdown_lang(open.lang()) && open.run == fence::MIN_RUN {
                    out.push(upgrade(line));
                    out.extend(body.iter().map(|l| (*l).clone()));
                    out.push(upgrade(&lines[c]));
                } else {
                    if has_inner && !is_markdown_lang(open.lang()) {
                        notes.push(FenceNote::InnerFenceOutsideMarkdown {
                            line: i + 1,
                            lang: open.lang().to_string(),
                        });
                    }
                    out.push(line.clone());
                    out.extend(body.iter().map(|l| (*l).clone()));
                    out.push(lines[c].clone());
                }
                i = c + 1;
            }
            None => {
                // No close found: best-effort pass-through, never an error.
                out.push(line.clone());
                out.extend(body.iter().map(|l| (*l).clone()));
                i = j;
            }
        }
    }

    NestOutcome { lines: out, notes }
}
