//! Translation of ECMA 262 regular expressions into the syntax of the
//! linear-time `regex` engine.
use crate::error::SchemaError;

/// The ECMA 262 `\s` set: ASCII whitespace plus the Unicode space
/// separators, line/paragraph separators and the BOM.
const WHITESPACE: &str = r" \t\n\x0B\x0C\r\x{A0}\x{1680}\x{2000}-\x{200A}\x{2028}\x{2029}\x{202F}\x{205F}\x{3000}\x{FEFF}";

/// Translate `pattern` from ECMA 262 syntax on a best-effort basis.
///
/// Outside character classes the perl classes become their ASCII-only
/// equivalents and an unescaped `$` becomes an end-of-string anchor; long
/// Unicode property names are rewritten to the short form; `\cX` becomes the
/// control character itself. Escapes that ECMA 262 does not define, such as
/// `\a`, are rejected.
pub(crate) fn translate(pattern: &str) -> Result<String, SchemaError> {
    let mut output = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    let mut in_class = false;
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => {
                let Some(&next) = chars.peek() else {
                    output.push('\\');
                    break;
                };
                match next {
                    'a' | 'e' => {
                        return Err(SchemaError::InvalidEcmaRegexp {
                            pattern: pattern.to_string(),
                        });
                    }
                    'd' if !in_class => {
                        chars.next();
                        output.push_str("[0-9]");
                    }
                    'D' if !in_class => {
                        chars.next();
                        output.push_str("[^0-9]");
                    }
                    'w' if !in_class => {
                        chars.next();
                        output.push_str("[A-Za-z0-9_]");
                    }
                    'W' if !in_class => {
                        chars.next();
                        output.push_str("[^A-Za-z0-9_]");
                    }
                    's' if !in_class => {
                        chars.next();
                        output.push('[');
                        output.push_str(WHITESPACE);
                        output.push(']');
                    }
                    'S' if !in_class => {
                        chars.next();
                        output.push_str("[^");
                        output.push_str(WHITESPACE);
                        output.push(']');
                    }
                    'c' => {
                        chars.next();
                        match chars.peek() {
                            Some(&letter) if letter.is_ascii_alphabetic() => {
                                chars.next();
                                output.push((letter as u8 % 32) as char);
                            }
                            _ => output.push_str("\\c"),
                        }
                    }
                    'p' | 'P' => {
                        chars.next();
                        output.push('\\');
                        output.push(next);
                        if chars.peek() == Some(&'{') {
                            chars.next();
                            let mut name = String::new();
                            for inner in chars.by_ref() {
                                if inner == '}' {
                                    break;
                                }
                                name.push(inner);
                            }
                            output.push('{');
                            output.push_str(property_name(&name));
                            output.push('}');
                        }
                    }
                    _ => {
                        chars.next();
                        output.push('\\');
                        output.push(next);
                    }
                }
            }
            '[' if !in_class => {
                in_class = true;
                output.push('[');
            }
            ']' if in_class => {
                in_class = false;
                output.push(']');
            }
            '$' if !in_class => output.push_str("\\z"),
            _ => output.push(ch),
        }
    }
    Ok(output)
}

/// Rewrite a long Unicode property name to the short form; names are
/// case-insensitive with `-` and space normalized to `_`.
fn property_name(name: &str) -> &str {
    let normalized = name
        .trim()
        .chars()
        .map(|ch| match ch {
            '-' | ' ' => '_',
            _ => ch.to_ascii_lowercase(),
        })
        .collect::<String>();
    match normalized.as_str() {
        "letter" => "L",
        "lowercase_letter" => "Ll",
        "uppercase_letter" => "Lu",
        "titlecase_letter" => "Lt",
        "modifier_letter" => "Lm",
        "other_letter" => "Lo",
        "cased_letter" => "LC",
        "mark" => "M",
        "nonspacing_mark" => "Mn",
        "spacing_mark" => "Mc",
        "enclosing_mark" => "Me",
        "number" => "N",
        "decimal_number" | "digit" => "Nd",
        "letter_number" => "Nl",
        "other_number" => "No",
        "punctuation" => "P",
        "connector_punctuation" => "Pc",
        "dash_punctuation" => "Pd",
        "open_punctuation" => "Ps",
        "close_punctuation" => "Pe",
        "initial_punctuation" => "Pi",
        "final_punctuation" => "Pf",
        "other_punctuation" => "Po",
        "symbol" => "S",
        "math_symbol" => "Sm",
        "currency_symbol" => "Sc",
        "modifier_symbol" => "Sk",
        "other_symbol" => "So",
        "separator" => "Z",
        "space_separator" => "Zs",
        "line_separator" => "Zl",
        "paragraph_separator" => "Zp",
        "other" => "C",
        "control" => "Cc",
        "format" => "Cf",
        "surrogate" => "Cs",
        "private_use" => "Co",
        "unassigned" => "Cn",
        _ => name,
    }
}

#[cfg(test)]
mod tests {
    use super::translate;
    use test_case::test_case;

    #[test_case(r"^\d+$", r"^[0-9]+\z")]
    #[test_case(r"\w-\W", r"[A-Za-z0-9_]-[^A-Za-z0-9_]")]
    #[test_case(r"[\d]", r"[\d]"; "perl classes inside classes are kept")]
    #[test_case(r"[$]", r"[$]"; "dollar inside a class is literal")]
    #[test_case(r"\$", r"\$"; "escaped dollar stays escaped")]
    #[test_case(r"\p{Letter}", r"\p{L}")]
    #[test_case(r"\p{decimal number}", r"\p{Nd}")]
    #[test_case(r"\P{dash-punctuation}", r"\P{Pd}")]
    #[test_case(r"\p{Lu}", r"\p{Lu}"; "short names pass through")]
    #[test_case(r"\cj", "\n"; "control escape becomes the control character")]
    #[test_case(r"\cJ", "\n"; "control letters fold case")]
    fn translation(input: &str, expected: &str) {
        assert_eq!(translate(input).expect("translatable"), expected);
    }

    #[test]
    fn whitespace_class_is_ascii_plus_unicode_spaces() {
        let translated = translate(r"\s").expect("translatable");
        let re = regex::Regex::new(&translated).expect("compilable");
        for ws in ['\t', '\n', ' ', '\u{a0}', '\u{2003}', '\u{feff}'] {
            assert!(re.is_match(&ws.to_string()), "{ws:?} should match");
        }
        assert!(!re.is_match("x"));
    }

    #[test]
    fn dollar_anchors_to_end_of_string() {
        let translated = translate("^a$").expect("translatable");
        let re = regex::Regex::new(&translated).expect("compilable");
        assert!(re.is_match("a"));
        assert!(!re.is_match("a\n"));
    }

    #[test_case(r"\a")]
    #[test_case(r"x\ey")]
    fn invalid_escapes_are_rejected(pattern: &str) {
        assert!(translate(pattern).is_err());
    }
}
