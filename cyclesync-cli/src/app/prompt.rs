use std::io::{self, BufRead, Write};

/// The user-interaction seam of every page. Implementations block until the
/// user answers, like the browser dialogs they replace; nothing destructive
/// happens unless `confirm` returned true, and `line` returning `None`
/// means the user cancelled the flow.
pub trait Prompt {
    /// Asks for one line of input. An empty answer falls back to `default`
    /// when one is given.
    fn line(&mut self, label: &str, default: Option<&str>) -> io::Result<Option<String>>;

    /// Asks a yes/no question.
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Blocking stdin/stdout prompt used by the real binary.
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn line(&mut self, label: &str, default: Option<&str>) -> io::Result<Option<String>> {
        let mut out = io::stdout().lock();
        match default {
            Some(value) => write!(out, "{label} [{value}]: ")?,
            None => write!(out, "{label}: ")?,
        }
        out.flush()?;

        let mut buffer = String::new();
        if io::stdin().lock().read_line(&mut buffer)? == 0 {
            // End of input is the cancel gesture.
            return Ok(None);
        }

        let entered = buffer.trim_end_matches(['\r', '\n']);
        Ok(Some(match (entered.is_empty(), default) {
            (true, Some(value)) => value.to_owned(),
            _ => entered.to_owned(),
        }))
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let Some(answer) = self.line(&format!("{question} [y/N]"), None)? else {
            return Ok(false);
        };

        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }
}

#[cfg(test)]
pub(crate) mod script {
    use super::Prompt;
    use std::collections::VecDeque;
    use std::io;

    /// Scripted prompt answers for page tests. Running out of answers acts
    /// like the user cancelling.
    #[derive(Default)]
    pub(crate) struct Script {
        lines: VecDeque<Option<String>>,
        confirms: VecDeque<bool>,
    }

    impl Script {
        pub(crate) fn new() -> Self {
            Self::default()
        }

        pub(crate) fn answer(mut self, line: &str) -> Self {
            self.lines.push_back(Some(line.to_owned()));
            self
        }

        pub(crate) fn accept_default(mut self) -> Self {
            self.lines.push_back(None);
            self
        }

        pub(crate) fn confirm_with(mut self, answer: bool) -> Self {
            self.confirms.push_back(answer);
            self
        }
    }

    impl Prompt for Script {
        fn line(&mut self, _label: &str, default: Option<&str>) -> io::Result<Option<String>> {
            match self.lines.pop_front() {
                Some(Some(line)) => Ok(Some(line)),
                // `accept_default` slots take whatever the page offered.
                Some(None) => Ok(default.map(str::to_owned)),
                None => Ok(None),
            }
        }

        fn confirm(&mut self, _question: &str) -> io::Result<bool> {
            Ok(self.confirms.pop_front().unwrap_or(false))
        }
    }
}
