//! Conversions between the `snake_case` keys sent by clients and the
//! `UpperCamelCase` field names used by [`Fields`](crate::Fields).
//!
//! Common initialisms are kept as a unit: `user_id` becomes `UserID`, not `UserId`.
use heck::ToSnakeCase;

/// Abbreviations that are spelled in upper case when they appear in a field name.
const INITIALISMS: &[&str] = &[
    "ACL", "API", "ASCII", "CPU", "CSS", "DNS", "EOF", "GUID", "HTML", "HTTP", "HTTPS", "ID",
    "IP", "JSON", "LHS", "QPS", "RAM", "RHS", "RPC", "SLA", "SMTP", "SQL", "SSH", "TCP", "TLS",
    "TTL", "UDP", "UI", "UID", "UUID", "URI", "URL", "UTF8", "VM", "XML", "XMPP", "XSRF", "XSS",
];

/// Convert a `snake_case` identifier into `CamelCase`.
///
/// The first word is capitalized only if `upper_first` is `true`.
/// Words that match a known initialism are upper-cased as a whole.
///
/// ```rust
/// use pavex_params::imbue::case::snake_to_camel_case;
///
/// assert_eq!(snake_to_camel_case("user_id", true), "UserID");
/// assert_eq!(snake_to_camel_case("profile_html", false), "profileHTML");
/// ```
pub fn snake_to_camel_case(s: &str, upper_first: bool) -> String {
    let mut camel = String::with_capacity(s.len());
    for (i, word) in s.split('_').filter(|word| !word.is_empty()).enumerate() {
        if i == 0 && !upper_first {
            camel.push_str(word);
            continue;
        }
        let upper = word.to_ascii_uppercase();
        if INITIALISMS.contains(&upper.as_str()) {
            camel.push_str(&upper);
        } else {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                camel.extend(first.to_uppercase());
                camel.push_str(chars.as_str());
            }
        }
    }
    camel
}

/// Convert a `CamelCase` identifier into `snake_case`.
///
/// Runs of upper-case letters are treated as a single word: `MyJSON` becomes `my_json`.
pub fn camel_to_snake_case(s: &str) -> String {
    s.to_snake_case()
}

#[cfg(test)]
mod tests {
    use super::{camel_to_snake_case, snake_to_camel_case};

    const PAIRS: &[(&str, &str)] = &[
        ("ID", "id"),
        ("User", "user"),
        ("UserName", "user_name"),
        ("UserID", "user_id"),
        ("MyJSON", "my_json"),
        ("ProfileHTML", "profile_html"),
        ("RequestXML", "request_xml"),
    ];

    #[test]
    fn camel_to_snake() {
        for (camel, snake) in PAIRS {
            assert_eq!(camel_to_snake_case(camel), *snake, "{camel}");
        }
    }

    #[test]
    fn snake_to_camel() {
        for (camel, snake) in PAIRS {
            assert_eq!(snake_to_camel_case(snake, true), *camel, "{snake}");
        }
    }

    #[test]
    fn lower_first_word() {
        assert_eq!(snake_to_camel_case("user_id", false), "userID");
        assert_eq!(snake_to_camel_case("id", false), "id");
        assert_eq!(snake_to_camel_case("created_at", false), "createdAt");
    }

    #[test]
    fn camel_case_input_is_left_alone() {
        assert_eq!(snake_to_camel_case("CreatedAt", true), "CreatedAt");
        assert_eq!(snake_to_camel_case("UserID", true), "UserID");
        assert_eq!(snake_to_camel_case("__double__underscore", true), "DoubleUnderscore");
    }
}
