//! RSA key pairs and PKCS#1 v1.5 signatures over SHA-256.
//!
//! Thin adapter over the RustCrypto `rsa` crate: key generation, PEM
//! import/export, signing and verification. Keys are handed around as plain
//! [`KeyPair`] component sets and only turned into `rsa` key objects at the
//! moment a primitive needs them.

use std::fmt;

use rand::rngs::OsRng;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey, EncodeRsaPrivateKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey, EncodePublicKey, LineEnding};
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Modulus size used when the caller does not ask for one.
pub const DEFAULT_KEY_BITS: usize = 1024;

/// Smallest modulus `generate_keypair` will make.
pub const MIN_KEY_BITS: usize = 512;

/// Largest modulus the library accepts back as a public key.
pub const MAX_KEY_BITS: usize = 4096;

/// RSA key components. `d` is only present on a private key.
#[derive(Clone)]
pub struct KeyPair {
    n: BigUint,
    e: BigUint,
    d: Option<BigUint>,
    // Known factors of `n`, kept when the library produced the key.
    primes: Vec<BigUint>,
}

impl PartialEq for KeyPair {
    fn eq(&self, other: &Self) -> bool {
        self.n == other.n && self.e == other.e && self.d == other.d
    }
}

impl Eq for KeyPair {}

impl KeyPair {
    /// Builds a key from raw components without checking how they relate.
    pub fn from_components(n: BigUint, e: BigUint, d: Option<BigUint>) -> Self {
        Self {
            n,
            e,
            d,
            primes: Vec::new(),
        }
    }

    /// Builds a key from hexadecimal components (an optional `0x` prefix is accepted).
    ///
    /// Only the syntax of each value is checked.
    pub fn from_hex(n: &str, e: &str, d: Option<&str>) -> Result<Self> {
        Ok(Self {
            n: parse_hex_uint("n", n)?,
            e: parse_hex_uint("e", e)?,
            d: d.map(|d| parse_hex_uint("d", d)).transpose()?,
            primes: Vec::new(),
        })
    }

    pub fn n(&self) -> &BigUint {
        &self.n
    }

    pub fn e(&self) -> &BigUint {
        &self.e
    }

    pub fn d(&self) -> Option<&BigUint> {
        self.d.as_ref()
    }

    pub fn is_private(&self) -> bool {
        self.d.is_some()
    }

    /// The public half of this key, with `d` dropped.
    pub fn public_key(&self) -> KeyPair {
        Self {
            n: self.n.clone(),
            e: self.e.clone(),
            d: None,
            primes: Vec::new(),
        }
    }

    /// Length in bytes of the modulus, which is also the signature length.
    pub fn modulus_len(&self) -> usize {
        (self.n.bits() + 7) / 8
    }

    pub fn n_hex(&self) -> String {
        self.n.to_str_radix(16)
    }

    pub fn e_hex(&self) -> String {
        self.e.to_str_radix(16)
    }

    pub fn d_hex(&self) -> Option<String> {
        self.d.as_ref().map(|d| d.to_str_radix(16))
    }

    fn to_rsa_public(&self) -> Result<RsaPublicKey> {
        RsaPublicKey::new(self.n.clone(), self.e.clone())
            .map_err(|e| Error::KeyRejected(e.to_string()))
    }

    fn to_rsa_private(&self) -> Result<RsaPrivateKey> {
        let d = self.d.clone().ok_or(Error::MissingPrivateExponent)?;
        // With no primes given the library recovers p and q from (n, e, d).
        RsaPrivateKey::from_components(self.n.clone(), self.e.clone(), d, self.primes.clone())
            .map_err(|e| Error::KeyRejected(e.to_string()))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("n", &self.n_hex())
            .field("e", &self.e_hex())
            .field("d", &self.d.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl From<&RsaPrivateKey> for KeyPair {
    fn from(key: &RsaPrivateKey) -> Self {
        Self {
            n: key.n().clone(),
            e: key.e().clone(),
            d: Some(key.d().clone()),
            primes: key.primes().to_vec(),
        }
    }
}

impl From<&RsaPublicKey> for KeyPair {
    fn from(key: &RsaPublicKey) -> Self {
        Self {
            n: key.n().clone(),
            e: key.e().clone(),
            d: None,
            primes: Vec::new(),
        }
    }
}

fn parse_hex_uint(field: &str, text: &str) -> Result<BigUint> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.is_empty() {
        return Err(Error::HexDecode(format!("{field} is empty")));
    }
    if let Some(c) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(Error::HexDecode(format!(
            "{field} contains non-hex character {c:?}"
        )));
    }
    BigUint::parse_bytes(digits.as_bytes(), 16)
        .ok_or_else(|| Error::HexDecode(format!("{field} is not a hex integer")))
}

/// An ASCII-only message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message(Vec<u8>);

impl Message {
    /// Accepts `bytes` only if every byte is in the ASCII range.
    pub fn from_ascii(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        if let Some((offset, &byte)) = bytes.iter().enumerate().find(|(_, b)| !b.is_ascii()) {
            return Err(Error::Encoding { offset, byte });
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Raw PKCS#1 v1.5 signature bytes, shown externally as lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Decodes a hex string; odd length or a non-hex character is an error.
    pub fn from_hex(text: &str) -> Result<Self> {
        Ok(Self(hex::decode(text.trim())?))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }

    /// The hex form split into lines of at most `width` characters.
    pub fn hex_chunks(&self, width: usize) -> Vec<String> {
        let hex = self.to_hex();
        hex.as_bytes()
            .chunks(width.max(1))
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect()
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Generate a fresh key pair with a modulus of `bits` bits.
///
/// # Errors
///
/// [`Error::KeyRejected`] when `bits` is outside
/// [`MIN_KEY_BITS`]..=[`MAX_KEY_BITS`]; a larger key could not be exported.
pub fn generate_keypair(bits: usize) -> Result<KeyPair> {
    if !(MIN_KEY_BITS..=MAX_KEY_BITS).contains(&bits) {
        return Err(Error::KeyRejected(format!(
            "modulus size {bits} is outside {MIN_KEY_BITS}..={MAX_KEY_BITS} bits"
        )));
    }
    log::debug!("generating {bits}-bit RSA key pair");
    let mut rng = OsRng;
    let private_key = RsaPrivateKey::new(&mut rng, bits)?;
    Ok(KeyPair::from(&private_key))
}

/// Export the public half of `key` as an SPKI `PUBLIC KEY` PEM block.
pub fn export_public_pem(key: &KeyPair) -> Result<String> {
    Ok(key.to_rsa_public()?.to_public_key_pem(LineEnding::LF)?)
}

/// Export `key` as a PKCS#1 `RSA PRIVATE KEY` PEM block.
///
/// # Errors
///
/// Fails with [`Error::MissingPrivateExponent`] on a public-only key.
pub fn export_private_pem(key: &KeyPair) -> Result<String> {
    Ok(key
        .to_rsa_private()?
        .to_pkcs1_pem(LineEnding::LF)?
        .to_string())
}

/// Import a key from PEM text.
///
/// Understands `PUBLIC KEY`, `RSA PUBLIC KEY`, `PRIVATE KEY` and
/// `RSA PRIVATE KEY` blocks. Private blocks yield a key with `d` set.
pub fn import_pem(pem: &str) -> Result<KeyPair> {
    let pem = pem.trim();
    let label = pem
        .lines()
        .next()
        .and_then(|line| line.strip_prefix("-----BEGIN "))
        .and_then(|rest| rest.strip_suffix("-----"))
        .ok_or_else(|| Error::Pem("missing -----BEGIN ...----- line".to_string()))?;

    match label {
        "PUBLIC KEY" => Ok(KeyPair::from(&RsaPublicKey::from_public_key_pem(pem)?)),
        "RSA PUBLIC KEY" => Ok(KeyPair::from(&RsaPublicKey::from_pkcs1_pem(pem)?)),
        "PRIVATE KEY" => Ok(KeyPair::from(&RsaPrivateKey::from_pkcs8_pem(pem)?)),
        "RSA PRIVATE KEY" => Ok(KeyPair::from(&RsaPrivateKey::from_pkcs1_pem(pem)?)),
        other => Err(Error::Pem(format!("unsupported PEM label {other:?}"))),
    }
}

/// Sign `message` with PKCS#1 v1.5 over its SHA-256 digest.
pub fn sign(message: &Message, private_key: &KeyPair) -> Result<Signature> {
    let key = private_key.to_rsa_private()?;
    let hashed = Sha256::digest(message.as_bytes());
    let signature = key.sign(Pkcs1v15Sign::new::<Sha256>(), &hashed)?;
    Ok(Signature(signature))
}

/// Verify a PKCS#1 v1.5 SHA-256 signature.
///
/// # Returns
///
/// `true` if the signature is valid, `false` for any verification failure,
/// including a public key the library will not use.
pub fn verify(message: &Message, signature: &Signature, public_key: &KeyPair) -> Result<bool> {
    let key = match public_key.to_rsa_public() {
        Ok(key) => key,
        Err(err) => {
            log::debug!("verification failed: {err}");
            return Ok(false);
        }
    };
    let hashed = Sha256::digest(message.as_bytes());
    match key.verify(Pkcs1v15Sign::new::<Sha256>(), &hashed, signature.as_bytes()) {
        Ok(()) => Ok(true),
        Err(_) => Ok(false),
    }
}
