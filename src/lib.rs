//! # CryptoShell
//!
//! Interactive RSA signing and verification.
//!
//! CryptoShell generates RSA key pairs, signs ASCII messages with PKCS#1 v1.5
//! over SHA-256, and verifies such signatures. Keys come from PEM files, a
//! pasted PEM block, or hex `n`/`e`/`d` values typed at a prompt.
//!
//! ## Shell commands
//!
//! - `rsagen [basename] [-f pubfile prifile] [-b] [-c]`: generate a key pair
//! - `rsasign [-k keyfile] [-m messagefile] [-b] [-c]`: sign a message
//! - `rsaverify [-k keyfile] [-m messagefile] [-b]`: verify a signature
//! - `help [cmd]`, `exit` (also `q` and end of input)
//!
//! ## Library use
//!
//! ```rust
//! use cryptoshell::crypto::{generate_keypair, sign, verify, Message};
//!
//! let key_pair = generate_keypair(1024).unwrap();
//! let message = Message::from_ascii("hello world").unwrap();
//!
//! let signature = sign(&message, &key_pair).unwrap();
//! assert_eq!(signature.as_bytes().len(), 128);
//!
//! let is_valid = verify(&message, &signature, &key_pair.public_key()).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`error::Result`]. Inside the shell an
//! error only aborts the current command; the loop prints it and carries on.
//! A signature that does not verify is a `false` result, not an error.

pub mod acquisition;
pub mod config;
pub mod crypto;
pub mod error;
pub mod input;
pub mod shell;
pub mod signals;
pub mod tokenizer;
pub mod workflow;

pub use error::{Error, Result};
