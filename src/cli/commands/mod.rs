pub mod config;
pub mod records;
pub mod system;
pub mod wizard;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandEntry;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(wizard::definitions());
    commands.extend(records::definitions());
    commands.extend(config::definitions());
    commands.extend(system::definitions());
    commands
}

/// Parses a 1-based row number from the first argument into a 0-based index.
pub(crate) fn parse_row_number(args: &[&str], usage: &str) -> Result<usize, CommandError> {
    let raw = args.first().ok_or_else(|| CommandError::usage(usage))?;
    match raw.trim().parse::<usize>() {
        Ok(number) if number >= 1 => Ok(number - 1),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{}` is not a row number (rows start at 1)",
            raw
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_numbers_are_one_based() {
        assert_eq!(parse_row_number(&["1"], "edit <row>").unwrap(), 0);
        assert_eq!(parse_row_number(&["12"], "edit <row>").unwrap(), 11);
        assert!(parse_row_number(&["0"], "edit <row>").is_err());
        assert!(parse_row_number(&["x"], "edit <row>").is_err());
        assert!(matches!(
            parse_row_number(&[], "edit <row>"),
            Err(CommandError::InvalidArguments(message)) if message == "Usage: edit <row>"
        ));
    }
}
