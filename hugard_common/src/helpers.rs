use std::sync::OnceLock;

use regex::Regex;

/// Parse a boolean flag from a string value, or return the given default value otherwise.
pub fn parse_boolean_flag(value: Option<String>, default: bool) -> bool {
    let value = match value {
        Some(v) => v,
        None => return default,
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

/// Strips shell and markup metacharacters from untrusted display names before they are echoed into outbound
/// messages.
///
/// The removed characters are `{ } ' " $ | ; * ? < > \ &`.
pub fn sanitize_display_name(text: &str) -> String {
    static METACHARACTERS: OnceLock<Regex> = OnceLock::new();
    let re = METACHARACTERS.get_or_init(|| Regex::new(r#"[{}'"$|;*?<>\\&]"#).expect("static regex is valid"));
    re.replace_all(text, "").into_owned()
}
