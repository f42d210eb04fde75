// Native tests for the letters-only pinyin filter and the wire format.

use pinyin_quiz::input::{sanitize, sanitize_with_caret, submission_text};
use pinyin_quiz::{InitialPage, ServerResponse, Status};

const SAMPLES: &[&str] = &[
    "",
    "ni",
    "NiHao",
    "ni3hao3",
    "lü",
    "  zhong guo ",
    "xue2-xi2!",
    "木头mu",
    "😀a😀b",
    "\tq\ni\r",
];

#[test]
fn sanitize_is_idempotent() {
    for s in SAMPLES {
        let once = sanitize(s);
        assert_eq!(sanitize(&once), once, "sanitize not idempotent for {s:?}");
        assert!(once.chars().all(|c| c.is_ascii_alphabetic()));
    }
}

#[test]
fn letters_pass_through_unchanged() {
    for s in ["a", "Zhong", "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ"] {
        assert_eq!(sanitize(s), s);
        let caret = s.len() as u32;
        assert_eq!(sanitize_with_caret(s, caret), (s.to_string(), caret));
    }
}

#[test]
fn caret_never_exceeds_clean_length() {
    for s in SAMPLES {
        let utf16_len = s.encode_utf16().count() as u32;
        for caret in 0..=utf16_len {
            let (clean, pos) = sanitize_with_caret(s, caret);
            assert_eq!(clean, sanitize(s));
            assert!(pos as usize <= clean.len(), "caret {pos} past end for {s:?}");
        }
    }
}

#[test]
fn whitespace_only_is_blank() {
    // Enter on these leaves the keystroke alone and sends nothing.
    assert_eq!(submission_text(""), None);
    assert_eq!(submission_text(" \t "), None);
    assert_eq!(submission_text("1 2 3"), None);
    assert_eq!(submission_text(" ni "), Some("ni".into()));
}

#[test]
fn terminal_replies_parse_without_state() {
    for (body, status) in [(r#"{"status":"win"}"#, Status::Win), (r#"{"status":"lose"}"#, Status::Lose)] {
        let resp = ServerResponse::parse(body).unwrap();
        assert_eq!(resp.status, status);
        assert!(resp.status.is_terminal());
        assert_eq!(resp.game_state, None);
    }
}

#[test]
fn non_json_reply_is_malformed() {
    assert!(ServerResponse::parse("<html>500</html>").is_err());
    assert!(ServerResponse::parse(r#"{"game_state":{}}"#).is_err());
}

#[test]
fn initial_page_with_snake_case_word() {
    let page = InitialPage::from_json(r#"{"lives":7,"score":3,"word_info":{"word":"汉字"}}"#).unwrap();
    let (config, state) = page.into_parts().unwrap();
    assert_eq!(config.total_lives, 10);
    assert_eq!(state.lives, Some(7));
    assert_eq!(state.word_info.unwrap().word, ["汉".to_string(), "字".to_string()]);
}
