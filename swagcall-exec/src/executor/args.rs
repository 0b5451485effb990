use std::collections::{BTreeMap, BTreeSet};

use secrecy::SecretString;

/// Scopes granted to the caller's token.
///
/// Either form answers membership the same way: a delimited string is split on
/// whitespace and compared scope by scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scopes {
    Delimited(String),
    Set(BTreeSet<String>),
}

impl Scopes {
    pub fn contains(&self, scope: &str) -> bool {
        match self {
            Scopes::Delimited(s) => s.split_whitespace().any(|s| s == scope),
            Scopes::Set(set) => set.contains(scope),
        }
    }
}

impl From<&str> for Scopes {
    fn from(s: &str) -> Self {
        Scopes::Delimited(s.to_string())
    }
}

impl From<String> for Scopes {
    fn from(s: String) -> Self {
        Scopes::Delimited(s)
    }
}

impl From<Vec<String>> for Scopes {
    fn from(v: Vec<String>) -> Self {
        Scopes::Set(v.into_iter().collect())
    }
}

impl From<BTreeSet<String>> for Scopes {
    fn from(set: BTreeSet<String>) -> Self {
        Scopes::Set(set)
    }
}

impl<'a> FromIterator<&'a str> for Scopes {
    fn from_iter<T: IntoIterator<Item = &'a str>>(iter: T) -> Self {
        Scopes::Set(iter.into_iter().map(str::to_string).collect())
    }
}

#[derive(Debug, Default)]
pub struct CallArgs {
    /// Parameter values by name. `Null` counts as not supplied.
    pub params: BTreeMap<String, serde_json::Value>,
    pub token: Option<SecretString>,
    pub scopes: Option<Scopes>,
}

impl CallArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    pub fn scopes(mut self, scopes: impl Into<Scopes>) -> Self {
        self.scopes = Some(scopes.into());
        self
    }

    /// Moves a string `token` parameter into the token slot when no token was given.
    pub(crate) fn take_legacy_token(&mut self) {
        if self.token.is_some() {
            return;
        }
        if let Some(serde_json::Value::String(t)) = self.params.get("token") {
            let t = t.clone();
            self.params.remove("token");
            self.token = Some(SecretString::from(t));
        }
    }
}
