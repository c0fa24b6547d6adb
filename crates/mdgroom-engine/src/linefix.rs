use std::sync::LazyLock;

use regex::Regex;

/// `**Label:** value` metadata line, not yet a bullet.
static LABEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*\*[^*]+:\*\*( |$)").expect("label regex"));

/// Numbered list marker with its indentation.
static NUMBERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)\d+\. ").expect("numbered regex"));

/// Lettered sub-list marker (`a.`, `b.`, ...) with its indentation.
static LETTERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s+)([a-z])\. ").expect("lettered regex"));

/// Metadata line already converted to a bullet.
static LABEL_BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^- \*\*[^*]+:\*\*( |$)").expect("label bullet regex"));

/// Split a line into its body and trailing terminator.
fn split_terminator(line: &str) -> (&str, &str) {
    if let Some(body) = line.strip_suffix("\r\n") {
        (body, "\r\n")
    } else if let Some(body) = line.strip_suffix('\n') {
        (body, "\n")
    } else {
        (line, "")
    }
}

/// Wrap bare dunder-style identifiers (`__name__`) in inline code.
///
/// Walks word tokens by hand; a token already adjacent to a backtick is
/// left alone, which makes re-application a no-op.
fn wrap_dunders(body: &str) -> String {
    let bytes = body.as_bytes();
    let mut out = String::with_capacity(body.len());
    let mut i = 0;
    while i < bytes.len() {
        if !(bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
            let start = i;
            while i < bytes.len() && !(bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            out.push_str(&body[start..i]);
            continue;
        }

        let start = i;
        while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
            i += 1;
        }
        let token = &body[start..i];
        let is_dunder = token.len() > 4 && token.starts_with("__") && token.ends_with("__");
        let left_tick = start > 0 && bytes[start - 1] == b'`';
        let right_tick = i < bytes.len() && bytes[i] == b'`';
        if is_dunder && !left_tick && !right_tick {
            out.push('`');
            out.push_str(token);
            out.push('`');
        } else {
            out.push_str(token);
        }
    }
    out
}

/// Convert runs of two-or-more consecutive `**Label:** ...` lines into
/// bullet items. A lone label line stays as it is.
fn bullet_metadata_labels(lines: &mut [String]) {
    let mut i = 0;
    while i < lines.len() {
        let (body, _) = split_terminator(&lines[i]);
        if !LABEL_RE.is_match(body) {
            i += 1;
            continue;
        }
        let run_start = i;
        while i < lines.len() && LABEL_RE.is_match(split_terminator(&lines[i]).0) {
            i += 1;
        }
        if i - run_start >= 2 {
            for line in &mut lines[run_start..i] {
                line.insert_str(0, "- ");
            }
        }
    }
}

/// Rewrite lettered sub-list markers nested under a numbered list item into
/// numeric markers (`a.` becomes `1.`, `b.` becomes `2.`, by the letter's
/// ordinal).
fn renumber_lettered_markers(lines: &mut [String]) {
    // Indent of the numbered item the letters hang off; reset at blanks.
    let mut numbered_indent: Option<usize> = None;
    for line in lines.iter_mut() {
        let (body, term) = split_terminator(line);
        if body.trim().is_empty() {
            numbered_indent = None;
            continue;
        }
        if let Some(caps) = LETTERED_RE.captures(body) {
            let indent = &caps[1];
            if numbered_indent.is_some_and(|n| indent.len() > n) {
                let ordinal = (caps[2].as_bytes()[0] - b'a' + 1) as usize;
                let rest = &body[caps[0].len()..];
                let fixed = format!("{indent}{ordinal}. {rest}{term}");
                *line = fixed;
                continue;
            }
        }
        if let Some(caps) = NUMBERED_RE.captures(body) {
            numbered_indent = Some(caps[1].len());
        }
    }
}

/// Indent a column-0 numbered list line that immediately follows a
/// metadata-bullet block, so it nests with the block above.
fn indent_list_after_bullets(lines: &mut [String]) {
    for i in 1..lines.len() {
        let prev_is_bullet = LABEL_BULLET_RE.is_match(split_terminator(&lines[i - 1]).0);
        let (body, _) = split_terminator(&lines[i]);
        if prev_is_bullet && NUMBERED_RE.is_match(body) && !body.starts_with(' ') {
            lines[i].insert_str(0, "  ");
        }
    }
}

/// Apply the fixed rule sequence to a run of processable lines.
///
/// Order is significant: bullet conversion must run before the indentation
/// rule, which keys off its output. Every rule is a no-op on already-fixed
/// input.
pub fn fix_lines(lines: &[String]) -> Vec<String> {
    let mut fixed: Vec<String> = lines
        .iter()
        .map(|line| {
            let (body, term) = split_terminator(line);
            let mut s = wrap_dunders(body);
            s.push_str(term);
            s
        })
        .collect();
    bullet_metadata_labels(&mut fixed);
    renumber_lettered_markers(&mut fixed);
    indent_list_after_bullets(&mut fixed);
    fixed
}
