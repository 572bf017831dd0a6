/// Log tags identify the subsystem a message comes from
///
/// Each tag maps to a `--debug-<key>` / `--verbose-<key>` flag.

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogTag {
    Cache,
    Config,
    Stress,
    System,
    Other(String),
}

impl LogTag {
    /// Key used in `--debug-<key>` flags
    pub fn to_debug_key(&self) -> String {
        match self {
            LogTag::Cache => "cache".to_string(),
            LogTag::Config => "config".to_string(),
            LogTag::Stress => "stress".to_string(),
            LogTag::System => "system".to_string(),
            LogTag::Other(s) => s.to_lowercase(),
        }
    }

    /// Uppercase label without colors
    pub fn to_plain_string(&self) -> String {
        match self {
            LogTag::Other(s) => s.to_uppercase(),
            other => other.to_debug_key().to_uppercase(),
        }
    }
}

impl std::fmt::Display for LogTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_plain_string())
    }
}
