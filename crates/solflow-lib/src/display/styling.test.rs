use super::*;

fn caps(color: TerminalColorCaps, unicode: TerminalUnicodeCaps) -> TerminalCapabilities {
    TerminalCapabilities {
        color,
        unicode,
        ..TerminalCapabilities::default()
    }
}

#[test]
fn test_plain_terminal_emits_no_escape_codes() {
    let styling = StyleManager::new(&caps(TerminalColorCaps::None, TerminalUnicodeCaps::Ascii));

    assert_eq!(styling.style_error("boom"), "boom");
    assert_eq!(styling.format_success("done"), "+ done");
    assert_eq!(styling.format_warning("careful"), "! careful");
    assert_eq!(styling.format_info("note"), "i note");
}

#[test]
fn test_color_terminal_wraps_text_in_escape_codes() {
    let styling = StyleManager::new(&caps(
        TerminalColorCaps::Ansi256,
        TerminalUnicodeCaps::BasicUnicode,
    ));

    let styled = styling.style_success("ok");
    assert!(styled.contains("\u{1b}["));
    assert!(styled.contains("ok"));
    assert!(styling.format_error("bad").contains("✗"));
}

#[test]
fn test_symbols_follow_unicode_caps() {
    assert_eq!(Symbols::for_caps(TerminalUnicodeCaps::Ascii), Symbols::ASCII);
    assert_eq!(
        Symbols::for_caps(TerminalUnicodeCaps::BasicUnicode),
        Symbols::UNICODE
    );

    let styling = StyleManager::new(&caps(
        TerminalColorCaps::None,
        TerminalUnicodeCaps::BasicUnicode,
    ));
    assert_eq!(styling.bullet(), "•");
}
