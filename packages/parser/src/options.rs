use serde::{Deserialize, Serialize};

/// Knobs for a single parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParseOptions {
    /// How many times recovery may land on the same token before it stops
    /// trying to advance from there.
    pub sync_limit: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { sync_limit: 10 }
    }
}

/// What the token stream is expected to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fragment {
    /// A whole file.
    #[default]
    File,
    /// The inside of a message block, without braces.
    MessageBody,
    EnumBody,
    ServiceBody,
}
