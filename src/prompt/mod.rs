//! Interactive prompts
//!
//! Commands talk to the user only through [`Prompt`], so the workflows can be
//! driven by a scripted implementation in tests.

use std::io;

use console::{style, Term};
use thiserror::Error;

/// Entries shown per page in [`TerminalPrompt::select`]
const PAGE_SIZE: usize = 10;

/// Consecutive empty answers without an active filter before `select` gives up
const MAX_EMPTY_ANSWERS: usize = 3;

#[derive(Debug, Error)]
pub enum PromptError {
    /// The user backed out of the prompt
    #[error("aborted by user")]
    Aborted,

    #[error("nothing to choose from")]
    NoChoices,

    /// No terminal to ask on, e.g. input or output redirected
    #[error("interactive command needs a terminal on stdin and stderr")]
    NotInteractive,

    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

#[cfg_attr(test, mockall::automock)]
pub trait Prompt {
    /// Let the user pick one of `items`, returning its index
    fn select(&mut self, label: &str, items: &[String]) -> Result<usize, PromptError>;

    /// Ask a yes/no question; an empty answer takes `default`
    fn confirm(&mut self, label: &str, default: bool) -> Result<bool, PromptError>;

    /// Collect one line of free text
    fn input(&mut self, label: &str) -> Result<String, PromptError>;
}

/// Case- and whitespace-insensitive substring match used to narrow choices
pub fn matches_filter(item: &str, filter: &str) -> bool {
    let normalize = |s: &str| {
        s.chars()
            .filter(|c| !c.is_whitespace())
            .flat_map(char::to_lowercase)
            .collect::<String>()
    };
    normalize(item).contains(&normalize(filter))
}

/// [`Prompt`] on the controlling terminal
///
/// Menus and questions go to stderr so stdout stays clean for command output.
pub struct TerminalPrompt {
    term: Term,
}

impl TerminalPrompt {
    pub fn new() -> Self {
        Self::on(Term::stderr())
    }

    pub fn on(term: Term) -> Self {
        Self { term }
    }

    /// `console` answers every read with an empty line when no user is
    /// attached, so every question would silently take its default
    fn ensure_interactive(&self) -> Result<(), PromptError> {
        if self.term.is_term() {
            Ok(())
        } else {
            Err(PromptError::NotInteractive)
        }
    }

    fn read_line(&self) -> Result<String, PromptError> {
        match self.term.read_line() {
            Ok(line) => Ok(line.trim().to_string()),
            Err(e) if matches!(e.kind(), io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof) => {
                Err(PromptError::Aborted)
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl Default for TerminalPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for TerminalPrompt {
    fn select(&mut self, label: &str, items: &[String]) -> Result<usize, PromptError> {
        self.ensure_interactive()?;
        let this = &*self;
        run_select(
            label,
            items,
            || this.read_line(),
            |line| this.term.write_line(line),
            |text| this.term.write_str(text),
        )
    }

    fn confirm(&mut self, label: &str, default: bool) -> Result<bool, PromptError> {
        self.ensure_interactive()?;
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        self.term.write_str(&format!("{} {} ", style(label).bold(), hint))?;

        let answer = self.read_line()?.to_lowercase();
        Ok(match answer.as_str() {
            "" => default,
            "y" | "yes" => true,
            _ => false,
        })
    }

    fn input(&mut self, label: &str) -> Result<String, PromptError> {
        self.ensure_interactive()?;
        self.term.write_str(&format!("{}: ", style(label).bold()))?;
        self.read_line()
    }
}

/// Paged, filterable menu loop behind [`TerminalPrompt::select`]
///
/// Digits choose among the shown entries, other text narrows the list, an
/// empty answer clears the filter and `q` aborts. Repeated empty answers
/// with nothing to clear abort as well.
fn run_select<R, L, S>(
    label: &str,
    items: &[String],
    mut read: R,
    mut line: L,
    mut ask: S,
) -> Result<usize, PromptError>
where
    R: FnMut() -> Result<String, PromptError>,
    L: FnMut(&str) -> io::Result<()>,
    S: FnMut(&str) -> io::Result<()>,
{
    if items.is_empty() {
        return Err(PromptError::NoChoices);
    }

    let mut filter = String::new();
    let mut empty_answers = 0;
    loop {
        let visible: Vec<usize> = (0..items.len())
            .filter(|&i| matches_filter(&items[i], &filter))
            .collect();

        line(&format!("{} ?", style(label).bold()))?;
        if !filter.is_empty() {
            line(&format!("  filter: {}", style(&filter).yellow()))?;
        }
        for (n, &i) in visible.iter().take(PAGE_SIZE).enumerate() {
            line(&format!("  {} {}", style(format!("[{}]", n + 1)).dim(), items[i]))?;
        }
        if visible.len() > PAGE_SIZE {
            line(&format!(
                "  {}",
                style(format!("... {} more, type to narrow", visible.len() - PAGE_SIZE)).dim()
            ))?;
        }
        if visible.is_empty() {
            line(&format!("  {}", style("no match").red()))?;
        }

        ask("Number to choose, text to filter, empty to reset, q to abort: ")?;
        let answer = read()?;

        if answer.is_empty() && filter.is_empty() {
            empty_answers += 1;
            if empty_answers >= MAX_EMPTY_ANSWERS {
                return Err(PromptError::Aborted);
            }
            continue;
        }
        empty_answers = 0;

        if answer.eq_ignore_ascii_case("q") {
            return Err(PromptError::Aborted);
        }

        match answer.parse::<usize>() {
            Ok(n) if n >= 1 && n <= visible.len().min(PAGE_SIZE) => {
                let index = visible[n - 1];
                line(&format!("{} {}", style("→").cyan(), items[index]))?;
                return Ok(index);
            }
            Ok(_) => line(&format!("{}", style("Number out of range").red()))?,
            Err(_) => filter = answer,
        }
    }
}
