//! String sanitization
//!
//! Rewrites strings so they carry no markup, script protocols, inline event
//! handlers or SQL clause phrases. Every rule only deletes text, and the
//! rules are re-applied until nothing changes, so the result is a fixpoint:
//! `sanitize_string(sanitize_string(x)) == sanitize_string(x)`.
//!
//! This is defense in depth. Queries must still be parameterized.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static RULES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Dangerous blocks, content included
        r"(?is)<\s*script\b[^>]*>.*?<\s*/\s*script\s*>",
        r"(?is)<\s*iframe\b[^>]*>.*?<\s*/\s*iframe\s*>",
        r"(?is)<\s*object\b[^>]*>.*?<\s*/\s*object\s*>",
        // Any remaining tag, then stray angle brackets
        r"(?s)<[^<>]*>",
        r"[<>]",
        // Script-capable URLs and inline handlers
        r"(?i)(javascript|vbscript)\s*:",
        r"(?i)data\s*:\s*text/html",
        r"(?i)\bon[a-z]+\s*=",
        // SQL keywords next to clause syntax
        r"(?i)\bunion\s+(all\s+)?select\b",
        r"(?i)\bselect\s+(\*|distinct\b)",
        r"(?i)\b(insert\s+into|delete\s+from|drop\s+(table|database|schema)|truncate\s+table|alter\s+table)\b",
        r"(?i)\bupdate\s+\w+\s+set\b",
        r"(?i)\bexec(ute)?\s*\(",
        r"--",
        r"/\*|\*/",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).expect("sanitizer patterns are valid"))
    .collect()
});

fn sanitize_pass(input: &str) -> String {
    RULES
        .iter()
        .fold(input.to_string(), |acc, rule| {
            rule.replace_all(&acc, "").into_owned()
        })
        .trim()
        .to_string()
}

/// Strip markup, script protocols, event handlers and SQL clause phrases
pub fn sanitize_string(input: &str) -> String {
    let mut current = input.to_string();
    loop {
        let next = sanitize_pass(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Sanitize every string leaf, depth first
///
/// Non-string leaves and object keys pass through unchanged.
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(sanitize_string(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, sanitize_value(value)))
                .collect(),
        ),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_strips_script_blocks_and_tags() {
        assert_eq!(sanitize_string("<script>alert(1)</script>"), "");
        assert_eq!(sanitize_string("hi <b>there</b>"), "hi there");
        assert_eq!(
            sanitize_string("<iframe src=\"x\"></iframe>ok<object data=x></object>"),
            "ok"
        );
        assert_eq!(sanitize_string("a < b"), "a  b");
    }

    #[test]
    fn test_neutralizes_protocols_and_handlers() {
        assert_eq!(sanitize_string("javascript:alert(1)"), "alert(1)");
        assert_eq!(sanitize_string("VBScript: x"), "x");
        assert_eq!(sanitize_string("data:text/html,hello"), ",hello");
        assert_eq!(sanitize_string("x onclick=steal()"), "x steal()");
    }

    #[test]
    fn test_strips_sql_clause_phrases() {
        assert_eq!(sanitize_string("UNION SELECT"), "");
        assert_eq!(
            sanitize_string("1 union all select name"),
            "1  name"
        );
        assert_eq!(sanitize_string("x'; DROP TABLE users;--"), "x';  users;");
    }

    #[test]
    fn test_is_idempotent() {
        for input in [
            "<script>alert(1)</script>",
            "javascript:alert(1)",
            "UNION SELECT",
            "<scr<script></script>ipt>alert(1)</script>",
            "javajavascript:script:alert(1)",
            "UNUNION SELECTION SELECT * FROM t",
            "  padded <i>text</i>  ",
            "plain text",
        ] {
            let once = sanitize_string(input);
            assert_eq!(sanitize_string(&once), once, "not idempotent for {input}");
        }
    }

    #[test]
    fn test_nested_rebuild_is_removed() {
        let out = sanitize_string("javajavascript:script:alert(1)");
        assert!(!out.to_lowercase().contains("javascript:"));
    }

    #[test]
    fn test_sanitize_value_walks_structure() {
        let input = json!({
            "name": "<b>Acme</b>",
            "tags": ["ok", "<i>x</i>"],
            "nested": { "note": "javascript:go()" },
            "count": 3,
            "active": true
        });

        assert_eq!(
            sanitize_value(input),
            json!({
                "name": "Acme",
                "tags": ["ok", "x"],
                "nested": { "note": "go()" },
                "count": 3,
                "active": true
            })
        );
    }
}
