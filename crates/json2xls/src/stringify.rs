//! Cell stringification
//!
//! Every cell is written as text. The rendering is fixed so the same input
//! always produces the same sheet:
//!
//! | JSON            | Cell text                          |
//! |-----------------|------------------------------------|
//! | `null`          | `""`                               |
//! | `"text"`        | `text` (unchanged)                 |
//! | `true`/`false`  | `true` / `false`                   |
//! | `12345`, `-7`   | `12345`, `-7`                      |
//! | `1.0`, `0.10`   | `1.0`, `0.10`                      |
//! | `1e20`, `1.5E-7`| `1e20`, `1.5E-7`                   |
//! | arrays/objects  | compact JSON text                  |
//!
//! Numbers keep the exact spelling of their JSON token (serde_json's
//! `arbitrary_precision` feature), so integers of any length keep every digit
//! and no float is ever re-rounded.

use std::borrow::Cow;

use serde_json::Value;

/// Text written to the sheet for one JSON cell value
pub fn cell_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(json: &str) -> String {
        let value: Value = serde_json::from_str(json).unwrap();
        cell_text(&value).into_owned()
    }

    #[test]
    fn test_scalars() {
        assert_eq!(text("null"), "");
        assert_eq!(text(r#""Alice""#), "Alice");
        assert_eq!(text(r#""""#), "");
        assert_eq!(text("true"), "true");
        assert_eq!(text("false"), "false");
    }

    #[test]
    fn test_numbers() {
        assert_eq!(text("12345"), "12345");
        assert_eq!(text("-7"), "-7");
        assert_eq!(text("0"), "0");
        assert_eq!(text("-0"), "-0");
        assert_eq!(text("18446744073709551615"), "18446744073709551615");
        assert_eq!(text("1.0"), "1.0");
        assert_eq!(text("0.1"), "0.1");
        assert_eq!(text("0.10"), "0.10");
        assert_eq!(text("-2.5"), "-2.5");
        assert_eq!(text("1.5E-7"), "1.5E-7");
    }

    #[test]
    fn test_exponents_keep_their_spelling() {
        assert_eq!(text("1e15"), "1e15");
        assert_eq!(text("1e16"), "1e16");
        assert_eq!(text("1e20"), "1e20");
        assert_eq!(text("1E+20"), "1E+20");
    }

    #[test]
    fn test_large_integers_keep_every_digit() {
        assert_eq!(text("18446744073709551616"), "18446744073709551616");
        assert_eq!(
            text("123456789012345678901234567890"),
            "123456789012345678901234567890"
        );
    }

    #[test]
    fn test_nested_numbers_keep_their_spelling() {
        let value: Value = serde_json::from_str("[1e20, 123456789012345678901234567890]").unwrap();
        assert_eq!(cell_text(&value), "[1e20,123456789012345678901234567890]");
    }

    #[test]
    fn test_strings_are_borrowed() {
        let value = json!("unchanged");
        assert!(matches!(cell_text(&value), Cow::Borrowed("unchanged")));
    }

    #[test]
    fn test_nested_values_render_as_json() {
        assert_eq!(cell_text(&json!([1, "a", null])), r#"[1,"a",null]"#);
        assert_eq!(cell_text(&json!({"k": true})), r#"{"k":true}"#);
    }
}
