//! Interactive prompts.
//!
//! The pipeline talks to the user through [`Prompter`]. On a terminal that is
//! [`Terminal`], built on `dialoguer`; with piped input or in tests it is the
//! line-oriented [`Console`] over any reader and writer.

use std::io::{self, BufRead, BufReader, IsTerminal, Stdin, Stdout, Write};

use ::console::Term;
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;

/// Question/answer channel with the user.
pub trait Prompter {
    /// Shows `message` and returns the user's answer, trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::UnexpectedEof`] when the input is exhausted,
    /// or any error from the underlying streams.
    fn prompt(&mut self, message: &str) -> io::Result<String>;

    /// Shows a line of text.
    ///
    /// # Errors
    ///
    /// Returns any error from the output stream.
    fn say(&mut self, message: &str) -> io::Result<()>;

    /// Shows `message` and blocks until Enter (or end of input).
    ///
    /// # Errors
    ///
    /// Returns any error from the underlying streams.
    fn pause(&mut self, message: &str) -> io::Result<()>;
}

/// Picks [`Terminal`] when stdin is a TTY, otherwise a line [`Console`] on stdio.
#[must_use]
pub fn stdio() -> Box<dyn Prompter> {
    if io::stdin().is_terminal() {
        Box::new(Terminal::new())
    } else {
        Box::new(Console::stdio())
    }
}

/// `dialoguer`-backed prompts on the controlling terminal.
#[derive(Debug)]
pub struct Terminal {
    term: Term,
}

impl Terminal {
    /// Prompts on stderr, like dialoguer's own widgets.
    #[must_use]
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for Terminal {
    fn prompt(&mut self, message: &str) -> io::Result<String> {
        let theme = ColorfulTheme::default();
        let answer: String = Input::with_theme(&theme)
            .with_prompt(message.trim())
            .allow_empty(true)
            .interact_text_on(&self.term)
            .map_err(|dialoguer::Error::IO(e)| e)?;
        Ok(answer.trim().to_string())
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        self.term.write_line(message)
    }

    fn pause(&mut self, message: &str) -> io::Result<()> {
        self.term.write_line(message)?;
        self.term.read_line().map(drop)
    }
}

/// Prompt/answer console over a reader and a writer.
#[derive(Debug)]
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl Console<BufReader<Stdin>, Stdout> {
    /// Console bound to the process's stdin/stdout.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Creates a console over arbitrary streams.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Consumes the console, returning its output stream.
    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompter for Console<R, W> {
    fn prompt(&mut self, message: &str) -> io::Result<String> {
        write!(self.output, "{message}\n> ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed while waiting for an answer",
            ));
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{message}")?;
        self.output.flush()
    }

    fn pause(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scripted(input: &str) -> Console<&[u8], Vec<u8>> {
        Console::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn test_prompt_returns_trimmed_line() {
        let mut console = scripted("  /tmp/mods  \n");
        let answer = console.prompt("Where?").unwrap();
        assert_eq!(answer, "/tmp/mods");
        let out = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(out, "Where?\n> ");
    }

    #[test]
    fn test_prompt_on_eof_is_unexpected_eof() {
        let mut console = scripted("");
        let err = console.prompt("Where?").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_pause_tolerates_eof() {
        let mut console = scripted("");
        assert!(console.pause("Press enter").is_ok());
    }

    #[test]
    fn test_console_works_behind_the_trait_object() {
        let mut boxed: Box<dyn Prompter> = Box::new(scripted("answer\n"));
        boxed.say("hello").unwrap();
        assert_eq!(boxed.prompt("Question?").unwrap(), "answer");
    }
}
