//! Shell-style tokenizing of a command line into flags and positional arguments.

use crate::error::{Error, Result};

/// Number of argument tokens each known flag consumes.
pub type FlagArity = &'static [(char, usize)];

/// One tokenized command line.
///
/// The first word is the command name and is kept apart from the arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    command: Option<String>,
    tokens: Vec<String>,
    flags: Vec<usize>,
    positional: Vec<usize>,
}

/// Splits `line` on whitespace, honoring single and double quotes.
pub fn split(line: &str) -> Result<Vec<String>> {
    shlex::split(line)
        .ok_or_else(|| Error::MalformedCommand("unbalanced quotes".to_string()))
}

fn flag_letter(token: &str) -> Option<char> {
    let mut chars = token.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some('-'), Some(c), None) if c.is_ascii_alphabetic() => Some(c),
        _ => None,
    }
}

impl CommandLine {
    /// Tokenizes `line`. Every flag must be listed in `arity`, and each must be
    /// followed by at least as many tokens as it consumes.
    pub fn parse(line: &str, arity: FlagArity) -> Result<Self> {
        let mut words = split(line)?.into_iter();
        let command = words.next();
        let tokens: Vec<String> = words.collect();

        let mut flags = Vec::new();
        let mut positional = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let token = &tokens[i];
            if !token.starts_with('-') {
                positional.push(i);
                i += 1;
                continue;
            }
            let flag = flag_letter(token)
                .ok_or_else(|| Error::MalformedCommand(format!("bad option {token:?}")))?;
            let takes = arity
                .iter()
                .find(|(f, _)| *f == flag)
                .map(|(_, k)| *k)
                .ok_or_else(|| Error::MalformedCommand(format!("unknown option -{flag}")))?;
            if i + takes >= tokens.len() {
                return Err(missing_args(flag, takes));
            }
            flags.push(i);
            i += 1 + takes;
        }

        Ok(Self {
            command,
            tokens,
            flags,
            positional,
        })
    }

    /// The command name, if the line was not empty.
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    pub fn has_option(&self, flag: char) -> bool {
        self.flag_index(flag).is_some()
    }

    /// The `count` tokens right after the first `-flag`.
    pub fn option_args(&self, flag: char, count: usize) -> Result<Vec<&str>> {
        let index = self
            .flag_index(flag)
            .ok_or_else(|| Error::MalformedCommand(format!("option -{flag} not given")))?;
        let args = self
            .tokens
            .get(index + 1..index + 1 + count)
            .ok_or_else(|| missing_args(flag, count))?;
        Ok(args.iter().map(String::as_str).collect())
    }

    /// Like [`CommandLine::option_args`] for a single-argument flag, `None` if absent.
    pub fn option_value(&self, flag: char) -> Result<Option<&str>> {
        if !self.has_option(flag) {
            return Ok(None);
        }
        Ok(self.option_args(flag, 1)?.first().copied())
    }

    /// Arguments that are neither flags nor consumed by a flag, in order.
    pub fn positional_args(&self) -> Vec<&str> {
        self.positional
            .iter()
            .map(|&i| self.tokens[i].as_str())
            .collect()
    }

    /// Fails unless there are at most `max` positional arguments.
    pub fn expect_at_most(&self, max: usize) -> Result<()> {
        let positional = self.positional_args();
        match positional.get(max) {
            Some(extra) => Err(Error::MalformedCommand(format!(
                "unexpected argument {extra:?}"
            ))),
            None => Ok(()),
        }
    }

    fn flag_index(&self, flag: char) -> Option<usize> {
        let needle = format!("-{flag}");
        self.flags
            .iter()
            .copied()
            .find(|&i| self.tokens[i] == needle)
    }
}

fn missing_args(flag: char, count: usize) -> Error {
    Error::MalformedCommand(format!(
        "option -{flag} needs {count} argument{}",
        if count == 1 { "" } else { "s" }
    ))
}
