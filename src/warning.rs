//! Non-fatal decode diagnostics

/// A warning generated while decoding.
///
/// Decoding never fails: corrupt input is skipped and reported here so the
/// caller can choose to print it or treat it as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct Warning {
    pub message: String,
}

impl Warning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
