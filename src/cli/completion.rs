//! Tab completion for the interactive shell.
//!
//! The first word completes to a command. After `set`, the second word
//! completes to a field of the active step and the third to one of that
//! field's choices.

use std::collections::HashMap;

use rustyline::{
    completion::{Completer, Pair},
    highlight::Highlighter,
    hint::Hinter,
    validate::Validator,
    Context, Helper,
};

use crate::schema::StepSchema;

pub(crate) struct FormCompleter {
    commands: Vec<String>,
    fields: Vec<String>,
    choices: HashMap<String, Vec<String>>,
}

impl FormCompleter {
    pub(crate) fn new(names: Vec<&'static str>) -> Self {
        let mut commands: Vec<String> = names.into_iter().map(str::to_ascii_lowercase).collect();
        commands.sort();
        commands.dedup();
        Self {
            commands,
            fields: Vec::new(),
            choices: HashMap::new(),
        }
    }

    /// Refreshes field and choice candidates for the step being filled.
    pub(crate) fn track_step(&mut self, step: Option<&StepSchema>) {
        self.fields.clear();
        self.choices.clear();
        let Some(step) = step else {
            return;
        };
        for field in &step.fields {
            self.fields.push(field.name.clone());
            if let Some(options) = field.options() {
                self.choices.insert(field.name.clone(), options.to_vec());
            }
        }
    }

    /// Returns the start of the word under the cursor and its candidates.
    fn candidates(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let before = &line[..pos];
        let start = before
            .rfind(char::is_whitespace)
            .map_or(0, |idx| idx + 1);
        let needle = before[start..].trim_start_matches('"').to_lowercase();
        let words: Vec<&str> = before[..start].split_whitespace().collect();

        let pool: &[String] = match words.as_slice() {
            [] => self.commands.as_slice(),
            [command] if command.eq_ignore_ascii_case("set") => self.fields.as_slice(),
            [command, field] if command.eq_ignore_ascii_case("set") => self
                .choices
                .get(*field)
                .map(Vec::as_slice)
                .unwrap_or(&[]),
            _ => &[],
        };

        let matches = pool
            .iter()
            .filter(|candidate| candidate.to_lowercase().starts_with(&needle))
            .cloned()
            .collect();
        (start, matches)
    }
}

fn quote_if_spaced(value: &str) -> String {
    if value.contains(char::is_whitespace) {
        format!("\"{value}\"")
    } else {
        value.to_string()
    }
}

impl Completer for FormCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let (start, matches) = self.candidates(line, pos);
        let pairs = matches
            .into_iter()
            .map(|candidate| Pair {
                replacement: quote_if_spaced(&candidate),
                display: candidate,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for FormCompleter {
    type Hint = String;
}

impl Highlighter for FormCompleter {}

impl Validator for FormCompleter {}

impl Helper for FormCompleter {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FormDefinition;

    fn completer() -> FormCompleter {
        let mut completer = FormCompleter::new(vec!["select", "set", "submit", "status"]);
        let definition = FormDefinition::standard();
        completer.track_step(definition.step_at(1).ok());
        completer
    }

    #[test]
    fn first_word_completes_commands() {
        let (start, matches) = completer().candidates("s", 1);
        assert_eq!(start, 0);
        assert_eq!(matches, vec!["select", "set", "status", "submit"]);
    }

    #[test]
    fn set_completes_fields_then_choices() {
        let completer = completer();
        assert_eq!(completer.candidates("set st", 6), (4, vec!["street".into(), "state".into()]));
        assert_eq!(
            completer.candidates("set state n", 11),
            (10, vec!["New York".into()])
        );
        assert_eq!(quote_if_spaced("New York"), "\"New York\"");
    }

    #[test]
    fn fields_clear_when_no_step_is_active() {
        let mut completer = completer();
        completer.track_step(None);
        assert!(completer.candidates("set ", 4).1.is_empty());
    }
}
