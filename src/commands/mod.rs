pub mod date;
pub mod help;
pub mod snapshot;

use chrono::NaiveDate;

use crate::utils::PipelineError;

/// A parsed line from the date-selection prompt
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Select(NaiveDate),
    Help,
    Quit,
    Empty,
}

/// Parse one input line. Anything that is not a keyword is read as a date.
pub fn parse_command(input: &str, today: NaiveDate) -> Result<Command, PipelineError> {
    let input = input.trim();

    match input.to_lowercase().as_str() {
        "" => Ok(Command::Empty),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" | "q" => Ok(Command::Quit),
        _ => date::parse_reference_date(input, today).map(Command::Select),
    }
}
