use crate::crypto::DEFAULT_KEY_BITS;

pub const INTRO: &str = "========================================\n\
                         CryptoShell\n\
                         ========================================\n\
                         Welcome! How may I help you today?";

pub const FAREWELL: &str =
    "May your day be filled with confidentiality, integrity, and availability!";

/// Settings shared by every command for the lifetime of one shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub prompt: String,
    /// Printed once when the loop starts; `None` to stay quiet.
    pub intro: Option<String>,
    pub farewell: String,
    /// Modulus size for `rsagen`.
    pub key_bits: usize,
    /// Hex characters per line in `rsasign -c` output.
    pub chunk_width: usize,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: "cs> ".to_string(),
            intro: Some(INTRO.to_string()),
            farewell: FAREWELL.to_string(),
            key_bits: DEFAULT_KEY_BITS,
            chunk_width: 64,
        }
    }
}
