#![forbid(unsafe_code)]

use serde::Deserialize;

/// How a whole module is driven through [`crate::verify_module`].
///
/// Deserializes from the `[verify]` table of `donor.toml`; missing keys take
/// their defaults.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifyConfig {
    /// Keep verifying the remaining functions after one fails.
    pub keep_going: bool,
    /// Verify functions on the rayon pool.
    pub parallel: bool,
    /// Cap on reported failures with `keep_going`; 0 means no cap.
    pub max_diagnostics: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            keep_going: false,
            parallel: true,
            max_diagnostics: 0,
        }
    }
}

impl VerifyConfig {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// Most failures a report may hold under this config.
    pub fn failure_limit(&self) -> usize {
        match (self.keep_going, self.max_diagnostics) {
            (false, _) => 1,
            (true, 0) => usize::MAX,
            (true, n) => n,
        }
    }
}
