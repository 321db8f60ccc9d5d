//! Arguments accepted by `depends`

use std::fmt;

use super::target::{Body, Target};
use super::value::Value;
use crate::error::GantError;

/// One argument to `depends`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dependency {
    /// A target named in the binding
    ByName(String),
    /// A body passed directly
    ByBody(Body),
    /// A list, spliced in place
    List(Vec<Self>),
}

impl From<&str> for Dependency {
    fn from(name: &str) -> Self {
        Self::ByName(name.to_string())
    }
}

impl From<String> for Dependency {
    fn from(name: String) -> Self {
        Self::ByName(name)
    }
}

impl From<Body> for Dependency {
    fn from(body: Body) -> Self {
        Self::ByBody(body)
    }
}

impl From<&Target> for Dependency {
    fn from(target: &Target) -> Self {
        Self::ByBody(target.body.clone())
    }
}

impl From<Vec<Self>> for Dependency {
    fn from(items: Vec<Self>) -> Self {
        Self::List(items)
    }
}

impl TryFrom<Value> for Dependency {
    type Error = GantError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Str(name) => Ok(Self::ByName(name)),
            Value::Body(body) => Ok(Self::ByBody(body)),
            Value::List(items) => {
                items.into_iter().map(Self::try_from).collect::<Result<Vec<_>, _>>().map(Self::List)
            },
            other => Err(GantError::UnknownDependency(other.to_string())),
        }
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ByName(name) => write!(f, "{name}"),
            Self::ByBody(body) => write!(f, "{body}"),
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            },
        }
    }
}
