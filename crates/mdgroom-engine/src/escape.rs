use crate::fence;

/// Opening half of the inline escape delimiter.
const DELIM_OPEN: &str = "`` ";
/// Closing half of the inline escape delimiter.
const DELIM_CLOSE: &str = " ``";

/// A line that already carries an escaped run was either processed before
/// or authored correctly; leave it alone wholesale.
fn already_escaped(line: &str) -> bool {
    line.contains("`` ```")
}

/// Wrap bare runs of three-or-more backticks in a prose line so they render
/// as literal text instead of being misread as fence markers.
///
/// `Output: ```markdown` becomes ``Output: `` ```markdown `` `` (the run and
/// its trailing word token, flanked by double-backtick-plus-space). The
/// caller must only pass processable lines; fence delimiter lines belong to
/// fenced segments and are never escaped.
///
/// Idempotent by construction: the scanner refuses to rewrap a run whose
/// left context ends with backtick-then-space or whose right context starts
/// with space-then-backtick, which covers our own output as well as runs
/// sitting inside an authored inline-code span.
pub fn escape_line(line: &str) -> String {
    debug_assert!(!fence::is_fence_line(line), "fence lines are never escaped");
    if !line.contains("```") || already_escaped(line) {
        return line.to_string();
    }

    let bytes = line.as_bytes();
    let mut out = String::with_capacity(line.len() + 8);
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'`' {
            let start = i;
            while i < bytes.len() && bytes[i] != b'`' {
                i += 1;
            }
            out.push_str(&line[start..i]);
            continue;
        }

        let start = i;
        while i < bytes.len() && bytes[i] == b'`' {
            i += 1;
        }
        if i - start < 3 {
            out.push_str(&line[start..i]);
            continue;
        }

        // Optional word token glued to the run (e.g. ```markdown).
        while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
            i += 1;
        }
        let chunk = &line[start..i];
        let inside_code_span =
            line[..start].ends_with("` ") || line[i..].starts_with(" `");
        if inside_code_span {
            out.push_str(chunk);
        } else {
            out.push_str(DELIM_OPEN);
            out.push_str(chunk);
            out.push_str(DELIM_CLOSE);
        }
    }
    out
}
