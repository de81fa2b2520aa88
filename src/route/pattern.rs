use crate::error::RouterError;
use crate::request::Params;

use std::fmt;

use regex::Regex;

const WILDCARD: &str = "*";

/// The path a route answers to.
#[derive(Clone)]
pub enum PathSpec {
    /// A path with optional `:name` segments, otherwise read as regex source.
    Literal(String),
    /// `"*"`, matching every path.
    Wildcard,
    /// A pre-compiled pattern, matched as a prefix.
    Pattern(Regex),
}

impl From<&str> for PathSpec {
    fn from(s: &str) -> Self {
        if s == WILDCARD {
            Self::Wildcard
        } else {
            Self::Literal(s.to_owned())
        }
    }
}

impl From<String> for PathSpec {
    fn from(s: String) -> Self {
        if s == WILDCARD {
            Self::Wildcard
        } else {
            Self::Literal(s)
        }
    }
}

impl From<Regex> for PathSpec {
    fn from(re: Regex) -> Self {
        Self::Pattern(re)
    }
}

impl PartialEq for PathSpec {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Literal(a), Self::Literal(b)) => a == b,
            (Self::Wildcard, Self::Wildcard) => true,
            (Self::Pattern(a), Self::Pattern(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl fmt::Debug for PathSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => write!(f, "{:?}", s),
            Self::Wildcard => f.write_str(WILDCARD),
            Self::Pattern(re) => write!(f, "/{}/", re.as_str()),
        }
    }
}

#[derive(Debug)]
pub(super) enum Matcher {
    Any,
    Regex(Regex),
}

impl Matcher {
    fn is_match(&self, path: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Regex(re) => re.is_match(path),
        }
    }
}

#[derive(Debug)]
pub(super) struct Pattern {
    whole: Option<Matcher>,
    prefix: Matcher,
    params: Vec<Box<str>>,
}

fn param_token() -> &'static Regex {
    static TOKEN: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r":([A-Za-z_$][A-Za-z0-9_$]*)").expect("valid token regex"))
}

impl Pattern {
    pub(super) fn compile(spec: &PathSpec) -> Result<Self, RouterError> {
        match spec {
            PathSpec::Wildcard => Ok(Self {
                whole: Some(Matcher::Any),
                prefix: Matcher::Any,
                params: Vec::new(),
            }),
            PathSpec::Pattern(re) => Ok(Self {
                whole: None,
                prefix: Matcher::Regex(re.clone()),
                params: Vec::new(),
            }),
            PathSpec::Literal(path) => Self::compile_literal(path),
        }
    }

    fn compile_literal(path: &str) -> Result<Self, RouterError> {
        let mut params: Vec<Box<str>> = Vec::new();
        let mut source = String::with_capacity(path.len() + 16);
        let mut last = 0;

        for caps in param_token().captures_iter(path) {
            let (Some(token), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let name = name.as_str();
            if params.iter().any(|p| &**p == name) {
                return Err(RouterError::DuplicateParam { name: name.into() });
            }
            params.push(name.into());

            source.push_str(&path[last..token.start()]);
            source.push_str("([^/]+)");
            last = token.end();
        }
        source.push_str(&path[last..]);

        let build = |suffix: &str| {
            Regex::new(&format!("^{}/?{}", source, suffix)).map_err(|e| {
                RouterError::InvalidPathSpec {
                    spec: path.to_owned(),
                    source: e,
                }
            })
        };

        Ok(Self {
            whole: Some(Matcher::Regex(build("$")?)),
            prefix: Matcher::Regex(build("")?),
            params,
        })
    }

    /// Exact (slash-tolerant) match for literal paths, prefix match for opaque patterns.
    pub(super) fn matches(&self, path: &str) -> bool {
        self.whole.as_ref().unwrap_or(&self.prefix).is_match(path)
    }

    /// Rebuilds `params` from the prefix matcher's captures.
    pub(super) fn extract(&self, path: &str, params: &mut Params) {
        params.clear();
        if self.params.is_empty() {
            return;
        }
        let Matcher::Regex(ref re) = self.prefix else {
            return;
        };
        let Some(caps) = re.captures(path) else {
            return;
        };
        for (i, name) in self.params.iter().enumerate() {
            if let Some(m) = caps.get(i + 1) {
                params.push(name, m.as_str());
            }
        }
    }

    pub(super) fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| &**p)
    }
}
