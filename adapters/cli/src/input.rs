//! Prompting loop that only yields commands from the known vocabulary.

use std::io::{self, BufRead, Write};

use escape_room_core::{normalize, ActionTable};

const PROMPT: &str = "Enter Command: ";
const INVALID_NOTICE: &str = "Invalid command, type `help` to list the commands.";

/// Iterator over validated, normalized commands read from `reader`.
///
/// Text outside the vocabulary is rejected with a notice and the player is
/// prompted again. The iterator ends when the reader reaches end of input.
pub(crate) struct ValidatedInput<'a, R, W> {
    reader: R,
    writer: W,
    actions: &'a ActionTable,
    line: String,
}

impl<'a, R, W> ValidatedInput<'a, R, W>
where
    R: BufRead,
    W: Write,
{
    pub(crate) fn new(reader: R, writer: W, actions: &'a ActionTable) -> Self {
        Self {
            reader,
            writer,
            actions,
            line: String::new(),
        }
    }

    fn prompt(&mut self) -> io::Result<Option<String>> {
        loop {
            write!(self.writer, "{PROMPT}")?;
            self.writer.flush()?;

            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }

            let command = normalize(&self.line);
            if self.actions.resolve(&command).is_some() {
                return Ok(Some(command));
            }
            if !command.is_empty() {
                writeln!(self.writer, "{INVALID_NOTICE}")?;
            }
        }
    }
}

impl<R, W> Iterator for ValidatedInput<'_, R, W>
where
    R: BufRead,
    W: Write,
{
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.prompt().transpose()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn read_all(input: &str) -> (Vec<String>, String) {
        let actions = ActionTable::standard();
        let mut written = Vec::new();
        let commands = ValidatedInput::new(Cursor::new(input.to_owned()), &mut written, &actions)
            .collect::<io::Result<Vec<_>>>()
            .expect("in-memory io never fails");
        (commands, String::from_utf8(written).expect("utf8 output"))
    }

    #[test]
    fn yields_normalized_commands() {
        let (commands, _) = read_all("Right\n  JR \nquit\n");
        assert_eq!(commands, vec!["right", "jr", "quit"]);
    }

    #[test]
    fn rejects_text_outside_vocabulary() {
        let (commands, output) = read_all("dance\n\nleft\n");
        assert_eq!(commands, vec!["left"]);
        assert_eq!(output.matches(INVALID_NOTICE).count(), 1);
        assert_eq!(output.matches(PROMPT).count(), 4);
    }

    #[test]
    fn ends_at_end_of_input() {
        let (commands, output) = read_all("");
        assert!(commands.is_empty());
        assert_eq!(output, PROMPT);
    }
}
