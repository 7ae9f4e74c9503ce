//! Turning files and interactive answers into keys, messages and signatures.

use std::io::Write;
use std::path::PathBuf;

use crate::crypto::{self, KeyPair, Message, Signature};
use crate::error::{Error, Result};
use crate::input::Console;

/// Whether a key is needed for verifying or for signing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Public,
    Private,
}

/// How a key typed at the prompt is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyFormat {
    /// One PEM block, `-----BEGIN` through `-----END`.
    Pem,
    /// Separate hex values for `n`, `e` and (private only) `d`.
    Hex,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    File(PathBuf),
    Prompt(KeyFormat),
}

impl KeySource {
    /// A key file wins; otherwise prompt in PEM or hex form.
    pub fn from_options(key_file: Option<&str>, pem: bool) -> Self {
        match key_file {
            Some(path) => KeySource::File(PathBuf::from(path)),
            None if pem => KeySource::Prompt(KeyFormat::Pem),
            None => KeySource::Prompt(KeyFormat::Hex),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageSource {
    File(PathBuf),
    Prompt,
}

impl MessageSource {
    pub fn from_options(message_file: Option<&str>) -> Self {
        match message_file {
            Some(path) => MessageSource::File(PathBuf::from(path)),
            None => MessageSource::Prompt,
        }
    }
}

/// Resolve a key of the requested kind.
///
/// A public key never carries `d`, even when it was read from a private key
/// file. A private key without `d` is rejected here rather than at signing time.
pub fn resolve_key(console: &mut Console<'_>, source: &KeySource, kind: KeyKind) -> Result<KeyPair> {
    let key = match source {
        KeySource::File(path) => {
            let bytes = console.read_file(path)?;
            crypto::import_pem(&String::from_utf8_lossy(&bytes))?
        }
        KeySource::Prompt(KeyFormat::Pem) => {
            let label = match kind {
                KeyKind::Public => "PUBLIC",
                KeyKind::Private => "RSA PRIVATE",
            };
            writeln!(
                console.out(),
                "Please provide the {} key in binary (PEM format), including the \
                 '-----BEGIN {label} KEY-----' and '-----END {label} KEY-----' tags:",
                kind_name(kind)
            )?;
            crypto::import_pem(&read_pem_block(console)?)?
        }
        KeySource::Prompt(KeyFormat::Hex) => {
            writeln!(
                console.out(),
                "Please provide the {} key in hex (without the '0x').",
                kind_name(kind)
            )?;
            let n = console.prompt("n=")?;
            let e = console.prompt("e=")?;
            let d = match kind {
                KeyKind::Public => None,
                KeyKind::Private => Some(console.prompt("d=")?),
            };
            KeyPair::from_hex(&n, &e, d.as_deref())?
        }
    };

    match kind {
        KeyKind::Public => Ok(key.public_key()),
        KeyKind::Private if key.is_private() => Ok(key),
        KeyKind::Private => Err(Error::MissingPrivateExponent),
    }
}

fn kind_name(kind: KeyKind) -> &'static str {
    match kind {
        KeyKind::Public => "public",
        KeyKind::Private => "private",
    }
}

/// Reads lines until one containing `-----END`, skipping anything before `-----BEGIN`.
pub fn read_pem_block(console: &mut Console<'_>) -> Result<String> {
    let mut block = String::new();
    loop {
        let line = console.next_line()?.ok_or(Error::EndOfInput)?;
        let line = line.trim();
        if block.is_empty() && !line.contains("-----BEGIN") {
            continue;
        }
        block.push_str(line);
        block.push('\n');
        if line.contains("-----END") {
            return Ok(block);
        }
    }
}

/// Resolve the message: a whole file, or one typed line without its terminator.
pub fn resolve_message(console: &mut Console<'_>, source: &MessageSource) -> Result<Message> {
    match source {
        MessageSource::File(path) => Message::from_ascii(console.read_file(path)?),
        MessageSource::Prompt => {
            writeln!(
                console.out(),
                "Please enter the message (the final newline is NOT part of the message):"
            )?;
            Message::from_ascii(console.prompt_bytes("")?)
        }
    }
}

/// Signatures are always typed in as hex.
pub fn prompt_signature(console: &mut Console<'_>) -> Result<Signature> {
    writeln!(console.out(), "Please enter the signature in hex:")?;
    Signature::from_hex(&console.prompt("")?)
}
