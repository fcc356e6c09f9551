//! Console methods a record can be dispatched through

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LoggerError;

/// Named output method of the host console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleMethod {
    #[default]
    Log,
    Info,
    Warn,
    Error,
    Dir,
    Table,
}

impl ConsoleMethod {
    pub const ALL: [ConsoleMethod; 6] = [
        ConsoleMethod::Log,
        ConsoleMethod::Info,
        ConsoleMethod::Warn,
        ConsoleMethod::Error,
        ConsoleMethod::Dir,
        ConsoleMethod::Table,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConsoleMethod::Log => "log",
            ConsoleMethod::Info => "info",
            ConsoleMethod::Warn => "warn",
            ConsoleMethod::Error => "error",
            ConsoleMethod::Dir => "dir",
            ConsoleMethod::Table => "table",
        }
    }

    /// Methods that belong on the error stream of a terminal
    pub fn is_alert(&self) -> bool {
        matches!(self, ConsoleMethod::Warn | ConsoleMethod::Error)
    }
}

impl fmt::Display for ConsoleMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsoleMethod {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConsoleMethod::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| LoggerError::unsupported(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_methods() {
        for method in ConsoleMethod::ALL {
            assert_eq!(method.as_str().parse::<ConsoleMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_parse_unknown_method() {
        let err = "trace".parse::<ConsoleMethod>().unwrap_err();
        assert!(matches!(err, LoggerError::UnsupportedMethod { method } if method == "trace"));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&ConsoleMethod::Warn).unwrap(), "\"warn\"");
        let method: ConsoleMethod = serde_json::from_str("\"table\"").unwrap();
        assert_eq!(method, ConsoleMethod::Table);
        assert!(serde_json::from_str::<ConsoleMethod>("\"shout\"").is_err());
    }

    #[test]
    fn test_is_alert() {
        assert!(ConsoleMethod::Error.is_alert());
        assert!(ConsoleMethod::Warn.is_alert());
        assert!(!ConsoleMethod::Log.is_alert());
        assert!(!ConsoleMethod::Table.is_alert());
    }
}
