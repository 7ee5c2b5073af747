//! Logging helpers for raw wire text so diagnostic lines stay single-line.
//! Serial noise routinely contains CR/LF and other control bytes that would
//! otherwise mangle the log.

/// Escape a string for single-line logging:
/// - `\n` => `\\n`
/// - `\r` => `\\r`
/// - `\t` => `\\t`
/// - backslash => `\\\\`
/// - other control characters => `\xNN`
///   Truncates past `MAX_PREVIEW` characters with an ellipsis; frames are at
///   most one rx buffer long, so the cap only trims pathological input.
pub fn escape_log(s: &str) -> String {
    const MAX_PREVIEW: usize = 96;
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 8);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                use std::fmt::Write;
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::escape_log;

    #[test]
    fn escapes_control_characters() {
        let esc = escape_log("STA R\r\nEND\x07");
        assert_eq!(esc, "STA R\\r\\nEND\\x07");
    }

    #[test]
    fn truncates_long_input() {
        let long = "x".repeat(200);
        let esc = escape_log(&long);
        assert!(esc.ends_with('…'));
        assert!(esc.chars().count() <= 97);
    }
}
