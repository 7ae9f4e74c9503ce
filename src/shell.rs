//! The interactive command loop.

use std::collections::BTreeMap;
use std::io::Write;

use crate::config::ShellConfig;
use crate::error::{Error, Result};
use crate::input::Console;
use crate::workflow;

/// What the loop does after a command finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    Continue,
    Terminate,
}

/// A command handler. Receives the whole input line and tokenizes it itself.
pub type Handler = fn(&mut Console<'_>, &ShellConfig, &str) -> Result<CommandResult>;

#[derive(Clone, Copy)]
enum Action {
    Help,
    Exit,
    Run(Handler),
}

struct Command {
    action: Action,
    usage: &'static str,
}

/// Alias used when input runs out.
pub const END_OF_INPUT: &str = "EOF";

/// Command table plus configuration. Built once, read-only while running.
pub struct Shell {
    config: ShellConfig,
    commands: BTreeMap<&'static str, Command>,
    aliases: BTreeMap<&'static str, &'static str>,
}

impl Shell {
    pub fn new(config: ShellConfig) -> Self {
        let mut shell = Self {
            config,
            commands: BTreeMap::new(),
            aliases: BTreeMap::new(),
        };
        shell.register("help", Action::Help, HELP_USAGE);
        shell.register("exit", Action::Exit, EXIT_USAGE);
        shell.alias("q", "exit");
        shell.alias(END_OF_INPUT, "exit");
        shell.register("rsagen", Action::Run(workflow::rsagen_command), RSAGEN_USAGE);
        shell.register("rsasign", Action::Run(workflow::rsasign_command), RSASIGN_USAGE);
        shell.register(
            "rsaverify",
            Action::Run(workflow::rsaverify_command),
            RSAVERIFY_USAGE,
        );
        shell
    }

    fn register(&mut self, name: &'static str, action: Action, usage: &'static str) {
        self.commands.insert(name, Command { action, usage });
    }

    fn alias(&mut self, alias: &'static str, target: &'static str) {
        self.aliases.insert(alias, target);
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    fn lookup(&self, name: &str) -> Option<&Command> {
        let name = self.aliases.get(name).copied().unwrap_or(name);
        self.commands.get(name)
    }

    /// Runs until a command terminates the shell or input ends.
    pub fn run(&self, console: &mut Console<'_>) -> Result<()> {
        if let Some(intro) = &self.config.intro {
            writeln!(console.out(), "{intro}")?;
        }
        loop {
            write!(console.out(), "{}", self.config.prompt)?;
            let line = match console.next_line()? {
                Some(line) => line,
                None => {
                    writeln!(console.out())?;
                    END_OF_INPUT.to_string()
                }
            };
            if self.dispatch(console, &line) == CommandResult::Terminate {
                return Ok(());
            }
        }
    }

    /// Runs one input line. Command errors are printed, never propagated.
    pub fn dispatch(&self, console: &mut Console<'_>, line: &str) -> CommandResult {
        let line = line.trim();
        let Some(name) = line.split_whitespace().next() else {
            return CommandResult::Continue;
        };

        let result = match self.lookup(name) {
            Some(command) => match command.action {
                Action::Help => self.help(console, line),
                Action::Exit => self.exit(console),
                Action::Run(handler) => handler(console, &self.config, line),
            },
            None => writeln!(
                console.out(),
                "Command not recognized: {name}. Type 'help' for a list of commands."
            )
            .map(|()| CommandResult::Continue)
            .map_err(Error::Io),
        };

        match result {
            Ok(next) => next,
            Err(err) => {
                log::warn!("command {name:?} failed: {err}");
                // A failing writer must not end the loop.
                let _ = writeln!(console.out(), "*** {err}");
                CommandResult::Continue
            }
        }
    }

    fn help(&self, console: &mut Console<'_>, line: &str) -> Result<CommandResult> {
        let out = console.out();
        match line.split_whitespace().nth(1) {
            Some(topic) => match self.lookup(topic) {
                Some(command) => writeln!(out, "{}", command.usage)?,
                None => writeln!(out, "*** No help on {topic}")?,
            },
            None => {
                writeln!(out, "\nDocumented commands (type help <topic>):")?;
                writeln!(out, "========================================")?;
                let names: Vec<&str> = self.commands.keys().copied().collect();
                writeln!(out, "{}", names.join("  "))?;
                writeln!(out, "Aliases: q -> exit, Ctrl-D -> exit\n")?;
            }
        }
        Ok(CommandResult::Continue)
    }

    fn exit(&self, console: &mut Console<'_>) -> Result<CommandResult> {
        writeln!(console.out(), "{}", self.config.farewell)?;
        Ok(CommandResult::Terminate)
    }
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(ShellConfig::default())
    }
}

const HELP_USAGE: &str = "help [command]\n    List available commands, or show how to use one.";

const EXIT_USAGE: &str = "exit\n    Exit the application. Shorthand: q or Ctrl-D";

const RSAGEN_USAGE: &str = "\
rsagen [basename] [-f pubfile prifile] [-b] [-c]
    Generate an RSA key pair and print its components in hex.
    basename   save the keys to <basename>_public_key.pem and <basename>_private_key.pem
    -f         save the keys to the two named PEM files instead
    -b         also print both keys in binary (PEM) format
    -c         also print the components in a code-friendly form";

const RSASIGN_USAGE: &str = "\
rsasign [-k keyfile] [-m messagefile] [-b] [-c]
    Sign an ASCII message with PKCS#1 v1.5 over SHA-256 and print the signature in hex.
    -k         read the private key from a PEM file (otherwise prompt for it)
    -m         read the message from a file (otherwise prompt for one line)
    -b         enter the private key as a PEM block instead of hex n, e, d
    -c         also print the signature as 64-character literal lines";

const RSAVERIFY_USAGE: &str = "\
rsaverify [-k keyfile] [-m messagefile] [-b]
    Verify a signature, entered in hex at the prompt, against a public key.
    -k         read the public key from a PEM file (otherwise prompt for it)
    -m         read the message from a file (otherwise prompt for one line)
    -b         enter the public key as a PEM block instead of hex n, e";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::LineReader;

    fn quiet() -> Shell {
        Shell::new(ShellConfig {
            intro: None,
            ..ShellConfig::default()
        })
    }

    fn session(shell: &Shell, script: impl AsRef<[u8]>) -> String {
        let mut input = LineReader::new(script.as_ref());
        let mut out = Vec::new();
        {
            let mut console = Console::new(&mut input, &mut out);
            shell.run(&mut console).unwrap();
        }
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_exit_and_aliases() {
        let shell = quiet();
        for script in ["exit\nhelp\n", "q\nhelp\n", ""] {
            let out = session(&shell, script);
            assert!(out.ends_with(&format!("{}\n", shell.config().farewell)), "{script:?}");
            assert!(!out.contains("Documented commands"));
        }
    }

    #[test]
    fn test_intro_banner() {
        let out = session(&Shell::default(), "exit\n");
        assert!(out.starts_with("========================================\nCryptoShell\n"));
        assert!(out.contains("cs> "));
    }

    #[test]
    fn test_unknown_command_keeps_running() {
        let out = session(&quiet(), "frobnicate now\n\n   \nexit\n");
        assert!(out.contains("Command not recognized: frobnicate."));
        assert!(out.contains("May your day be filled"));
    }

    #[test]
    fn test_non_utf8_line_keeps_running() {
        let shell = quiet();
        let out = session(&shell, b"caf\xe9\nhelp\nexit\n");
        assert!(out.contains("Command not recognized: caf\u{fffd}."));
        assert!(out.contains("rsagen  rsasign  rsaverify"));
        assert!(out.ends_with(&format!("{}\n", shell.config().farewell)));
    }

    #[test]
    fn test_typed_non_ascii_message_is_reported() {
        let out = session(&quiet(), b"rsasign -k fixtures/rsa.private.pem\ncaf\xe9\nexit\n");
        assert!(out.contains("*** Message is not ASCII: byte 0xe9 at offset 3"), "{out}");
        assert!(out.ends_with("availability!\n"));
    }

    #[test]
    fn test_help() {
        let out = session(&quiet(), "help\nhelp rsasign\nhelp q\nhelp nope\nexit\n");
        assert!(out.contains("rsagen  rsasign  rsaverify"));
        assert!(out.contains("rsasign [-k keyfile] [-m messagefile] [-b] [-c]"));
        assert!(out.contains("Exit the application. Shorthand: q or Ctrl-D"));
        assert!(out.contains("*** No help on nope"));
    }

    #[test]
    fn test_missing_file_does_not_end_shell() {
        let out = session(&quiet(), "rsasign -k missing.pem -m b.txt\nhelp exit\nexit\n");
        assert!(out.contains("*** File not found: missing.pem"));
        assert!(out.contains("Exit the application."));
        assert!(out.ends_with("availability!\n"));
    }

    #[test]
    fn test_malformed_command_is_reported() {
        let out = session(&quiet(), "rsagen -f only_one\nexit\n");
        assert!(out.contains("*** Malformed command: option -f needs 2 arguments"));
    }

    #[test]
    fn test_input_ending_mid_command() {
        // The hex prompt hits end of input, then the loop sees it too and exits.
        let out = session(&quiet(), "rsaverify\nabcd\n");
        assert!(out.contains("*** Input ended before the prompt was answered"));
        assert!(out.ends_with("availability!\n"));
    }

    #[test]
    fn test_generate_sign_verify_session() {
        let dir = tempfile::tempdir().unwrap();
        let base = dir.path().join("bob").display().to_string();
        let shell = quiet();

        session(&shell, &format!("rsagen {base}\nexit\n"));
        let out = session(
            &shell,
            &format!("rsasign -k {base}_private_key.pem\nhello world\nexit\n"),
        );
        let signature = out
            .lines()
            .skip_while(|l| !l.ends_with("Your signature is"))
            .nth(1)
            .unwrap()
            .to_string();
        assert_eq!(signature.len(), 256);

        let out = session(
            &shell,
            &format!("rsaverify -k {base}_public_key.pem\nhello world\n{signature}\nexit\n"),
        );
        assert!(out.contains("Signature is VALID"));
    }
}
