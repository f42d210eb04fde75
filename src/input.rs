//! Letters-only filtering of the pinyin field.
//!
//! Only ASCII letters survive; the tone mark / ü conversions happen server side.

/// Strip every character outside `[a-zA-Z]`.
pub fn sanitize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_alphabetic()).collect()
}

/// Sanitize and remap a caret position.
///
/// `caret` is a UTF-16 offset as reported by `selectionStart`; the returned caret
/// sits after the same kept letters it followed before filtering.
pub fn sanitize_with_caret(raw: &str, caret: u32) -> (String, u32) {
    let mut out = String::with_capacity(raw.len());
    let mut utf16_pos = 0u32;
    let mut new_caret = 0u32;
    for c in raw.chars() {
        let keep = c.is_ascii_alphabetic();
        if keep {
            out.push(c);
        }
        utf16_pos += c.len_utf16() as u32;
        if utf16_pos <= caret && keep {
            new_caret += 1;
        }
    }
    (out, new_caret)
}

/// The answer to submit on Enter, or `None` when the field is blank.
pub fn submission_text(raw: &str) -> Option<String> {
    let answer = sanitize(raw.trim());
    if answer.is_empty() { None } else { Some(answer) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_digits_and_tones() {
        assert_eq!(sanitize("ni3 hǎo!"), "niho");
    }

    #[test]
    fn caret_follows_kept_letters() {
        // "ab1|c" -> "ab|c"
        assert_eq!(sanitize_with_caret("ab1c", 3), ("abc".to_string(), 2));
        // caret at end
        assert_eq!(sanitize_with_caret("x😀y", 4), ("xy".to_string(), 2));
        // caret before removed astral char
        assert_eq!(sanitize_with_caret("x😀y", 1), ("xy".to_string(), 1));
    }

    #[test]
    fn blank_is_not_submitted() {
        assert_eq!(submission_text("   "), None);
        assert_eq!(submission_text(" hao "), Some("hao".to_string()));
    }
}
