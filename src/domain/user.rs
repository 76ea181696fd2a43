use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use super::ObjectId;

/// Access kind recorded alongside every session token.
pub const AUTH_ACCESS: &str = "auth";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthToken {
    pub access: String,
    pub token: String,
}

impl AuthToken {
    #[must_use]
    pub fn auth(token: impl Into<String>) -> Self {
        Self {
            access: AUTH_ACCESS.to_string(),
            token: token.into(),
        }
    }

    fn is_auth(&self, token: &str) -> bool {
        self.access == AUTH_ACCESS && self.token == token
    }
}

/// Active session tokens of one user, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenList(Vec<AuthToken>);

impl TokenList {
    #[must_use]
    pub const fn new(tokens: Vec<AuthToken>) -> Self {
        Self(tokens)
    }

    /// Appends a freshly issued auth token. Earlier tokens stay valid.
    pub fn issue(&mut self, token: impl Into<String>) -> &AuthToken {
        self.0.push(AuthToken::auth(token));
        &self.0[self.0.len() - 1]
    }

    /// Revocation check: a signed token is only honoured while it is listed here.
    #[must_use]
    pub fn has_auth_token(&self, token: &str) -> bool {
        self.0.iter().any(|t| t.is_auth(token))
    }

    /// Removes the first matching auth token. Returns whether one was removed.
    pub fn revoke(&mut self, token: &str) -> bool {
        match self.0.iter().position(|t| t.is_auth(token)) {
            Some(index) => {
                self.0.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of live sessions.
    #[must_use]
    pub fn session_count(&self) -> usize {
        self.0.len()
    }
}

/// A registered account.
///
/// Serializes to `{_id, email}` only; the password hash is never loaded into
/// this type and the token list is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub email: String,
    #[serde(skip)]
    pub tokens: TokenList,
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .expect("Invalid regex")
    })
}

/// Trims and lowercases an email address, returning `None` if the result is
/// not a syntactically valid address.
#[must_use]
pub fn normalize_email(raw: &str) -> Option<String> {
    let email = raw.trim().to_lowercase();
    email_regex().is_match(&email).then_some(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_is_additive() {
        let mut tokens = TokenList::default();
        tokens.issue("a");
        tokens.issue("b");

        assert_eq!(tokens.session_count(), 2);
        assert!(tokens.has_auth_token("a"));
        assert!(tokens.has_auth_token("b"));
    }

    #[test]
    fn test_revoke_removes_exactly_one() {
        let mut tokens = TokenList::new(vec![AuthToken::auth("a"), AuthToken::auth("b")]);

        assert!(tokens.revoke("a"));
        assert!(!tokens.has_auth_token("a"));
        assert!(tokens.has_auth_token("b"));

        // removing an absent token is a no-op
        assert!(!tokens.revoke("a"));
        assert_eq!(tokens.session_count(), 1);
    }

    #[test]
    fn test_other_access_kinds_do_not_authenticate() {
        let tokens = TokenList::new(vec![AuthToken {
            access: "reset".to_string(),
            token: "a".to_string(),
        }]);
        assert!(!tokens.has_auth_token("a"));
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(
            normalize_email(" Tom@Example.com ").as_deref(),
            Some("tom@example.com")
        );
        assert_eq!(normalize_email("a.b+c@mail.co.uk").as_deref(), Some("a.b+c@mail.co.uk"));
        assert_eq!(normalize_email("tom"), None);
        assert_eq!(normalize_email("tom@"), None);
        assert_eq!(normalize_email("@example.com"), None);
        assert_eq!(normalize_email("tom@example"), None);
        assert_eq!(normalize_email(""), None);
    }

    #[test]
    fn test_user_serialization_hides_tokens() {
        let mut tokens = TokenList::default();
        tokens.issue("secret");
        let user = User {
            id: ObjectId::parse("59adda490c3399eb074f8a77").unwrap(),
            email: "tom@example.com".to_string(),
            tokens,
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"_id": "59adda490c3399eb074f8a77", "email": "tom@example.com"})
        );
    }
}
