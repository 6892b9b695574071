use super::*;

fn env_with(configure: impl FnOnce(&mut TerminalEnv)) -> TerminalEnv {
    let mut env = TerminalEnv::default();
    configure(&mut env);
    env
}

#[test]
fn test_truecolor_detection_via_colorterm() {
    let env = env_with(|e| e.colorterm = Some("truecolor".to_string()));
    assert_eq!(detect_color_from_environment(&env), TerminalColorCaps::TrueColor);

    let env = env_with(|e| e.colorterm = Some("24BIT".to_string()));
    assert_eq!(detect_color_from_environment(&env), TerminalColorCaps::TrueColor);
}

#[test]
fn test_256_color_detection_via_term() {
    let env = env_with(|e| e.term = Some("xterm-256color".to_string()));
    assert_eq!(detect_color_from_environment(&env), TerminalColorCaps::Ansi256);
}

#[test]
fn test_dumb_terminal_has_no_color() {
    let env = env_with(|e| e.term = Some("dumb".to_string()));
    assert_eq!(detect_color_from_environment(&env), TerminalColorCaps::None);
    assert_eq!(
        detect_color_from_environment(&TerminalEnv::default()),
        TerminalColorCaps::None
    );
}

#[test]
fn test_windows_terminal_detection() {
    let env = env_with(|e| e.wt_session = Some("abc".to_string()));
    assert_eq!(detect_color_from_environment(&env), TerminalColorCaps::TrueColor);
    assert_eq!(detect_unicode_capabilities(&env), TerminalUnicodeCaps::BasicUnicode);
}

#[test]
fn test_intent_overrides_detection() {
    let env = env_with(|e| e.term = Some("xterm-256color".to_string()));

    assert_eq!(
        resolve_color(ColorIntent::Never, &env, true),
        TerminalColorCaps::None
    );
    assert_eq!(
        resolve_color(ColorIntent::Auto, &env, false),
        TerminalColorCaps::None
    );
    assert_eq!(
        resolve_color(ColorIntent::Auto, &env, true),
        TerminalColorCaps::Ansi256
    );
    // Forcing colour on a pipe still yields at least basic ANSI
    assert_eq!(
        resolve_color(ColorIntent::Always, &TerminalEnv::default(), false),
        TerminalColorCaps::Ansi16
    );
}

#[test]
fn test_unicode_detection_via_locale_precedence() {
    let env = env_with(|e| e.lang = Some("en_US.UTF-8".to_string()));
    assert_eq!(detect_unicode_capabilities(&env), TerminalUnicodeCaps::BasicUnicode);

    let env = env_with(|e| {
        e.lang = Some("en_US.UTF-8".to_string());
        e.lc_all = Some("C".to_string());
    });
    assert_eq!(detect_unicode_capabilities(&env), TerminalUnicodeCaps::Ascii);

    let env = env_with(|e| {
        e.lc_all = Some(String::new());
        e.lc_ctype = Some("de_DE.utf8".to_string());
    });
    assert_eq!(detect_unicode_capabilities(&env), TerminalUnicodeCaps::BasicUnicode);
}

#[test]
fn test_columns_fallback_from_environment() {
    let env = env_with(|e| e.columns = Some("132".to_string()));
    assert_eq!(detect_columns(&env, false), 132);

    let env = env_with(|e| e.columns = Some("wide".to_string()));
    assert_eq!(detect_columns(&env, false), 80);
}
