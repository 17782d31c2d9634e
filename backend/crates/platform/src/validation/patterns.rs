//! Malicious-input heuristics
//!
//! A hard gate for fields whose meaning must not be silently rewritten
//! (search queries, free text). It over-approximates: a positive result
//! means "refuse", not "proven attack".

use std::sync::LazyLock;

use regex::RegexSet;

static MALICIOUS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        // XSS
        r"(?i)<\s*/?\s*(script|iframe|object|embed|svg|img)\b",
        r"(?i)(javascript|vbscript)\s*:",
        r"(?i)data\s*:\s*text/html",
        r"(?i)\bon[a-z]+\s*=",
        // SQL injection
        r"(?i)'\s*(or|and)\b",
        r"(?i);\s*(drop|delete|insert|update|alter|create|truncate|exec|shutdown)\b",
        r"--",
        r"/\*",
        r"(?i)\bunion\b\s+(all\s+)?select\b",
        // Path traversal
        r"\.\./",
        r"\.\.\\",
        // Command injection
        r"[;&|`]",
        r"\$\(",
        // Template injection
        r"\{\{.*\}\}",
        r"\$\{",
        // LDAP injection
        r"\*\)\(",
        r"\(\|",
        r"\(&",
    ])
    .expect("malicious-input patterns are valid")
});

/// True when `input` matches any XSS, SQL, traversal, command, template or
/// LDAP injection heuristic
pub fn contains_malicious_patterns(input: &str) -> bool {
    MALICIOUS.is_match(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_injection_families() {
        for input in [
            "<script>alert(1)</script>",
            "<IMG src=x onerror=alert(1)>",
            "javascript:alert(1)",
            "'; DROP TABLE users;--",
            "admin' OR '1'='1",
            "1 UNION SELECT password FROM users",
            "../../etc/passwd",
            "..\\windows\\system32",
            "foo; rm -rf /",
            "a | cat /etc/shadow",
            "$(whoami)",
            "{{7*7}}",
            "${jndi:ldap://x}",
            "*)(uid=*",
            "(|(user=*))",
        ] {
            assert!(contains_malicious_patterns(input), "missed: {input}");
        }
    }

    #[test]
    fn test_accepts_ordinary_text() {
        for input in [
            "road construction Maharashtra",
            "Supply of medical equipment (2024)",
            "bridge repair 50,000-100,000",
            "O'Brien consulting",
            "user@example.com",
        ] {
            assert!(!contains_malicious_patterns(input), "false positive: {input}");
        }
    }
}
