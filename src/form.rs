//! Line-oriented form input for the interactive prompt.
//!
//! A line like `niche=coffee shops; audience=young professionals` updates the
//! named fields; pressing Enter submits the form as it stands.

use crate::error::{NicheScoutError, Result};
use crate::export::ExportFormat;
use crate::schemas::QueryParams;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormCommand {
    /// Update fields (possibly none) and submit
    Submit,
    Export(ExportFormat),
    Show,
    Help,
    Quit,
}

/// Interpret one input line, updating `form` in place for field assignments.
pub fn parse_line(form: &mut QueryParams, line: &str) -> Result<FormCommand> {
    let trimmed = line.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "quit" | "exit" | "q" => return Ok(FormCommand::Quit),
        "help" | "?" => return Ok(FormCommand::Help),
        "show" => return Ok(FormCommand::Show),
        "json" | "txt" | "pdf" => return Ok(FormCommand::Export(trimmed.parse()?)),
        _ => {}
    }

    for assignment in trimmed.split(';').filter(|s| !s.trim().is_empty()) {
        let (key, value) = assignment
            .split_once('=')
            .ok_or_else(|| NicheScoutError::Validation {
                message: format!("expected field=value, got '{}'", assignment.trim()),
            })?;
        let value = value.trim().to_string();
        match key.trim().to_ascii_lowercase().as_str() {
            "niche" | "nicho" => form.niche = value,
            "audience" | "audiencia" => form.audience = value,
            "location" | "ubicacion" => form.location = value,
            "platform" | "plataforma" => form.platform = value,
            other => {
                return Err(NicheScoutError::Validation {
                    message: format!("unknown field '{other}'"),
                });
            }
        }
    }

    Ok(FormCommand::Submit)
}

pub const HELP: &str = "\
Fields: niche (required), audience (required), location, platform
  niche=coffee shops; audience=young professionals   set fields and submit
  <Enter>                                            submit the current form
  json | txt | pdf                                   export the last result
  show                                               print the current form
  quit                                               leave";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignments_update_fields_and_submit() {
        let mut form = QueryParams::default();
        let cmd = parse_line(&mut form, "niche = coffee shops ; audiencia=young pros").unwrap();
        assert_eq!(cmd, FormCommand::Submit);
        assert_eq!(form.niche, "coffee shops");
        assert_eq!(form.audience, "young pros");
        assert_eq!(form.location, "");
    }

    #[test]
    fn empty_line_submits_unchanged_form() {
        let mut form = QueryParams::new("a", "b");
        assert_eq!(parse_line(&mut form, "").unwrap(), FormCommand::Submit);
        assert_eq!(form, QueryParams::new("a", "b"));
    }

    #[test]
    fn export_and_control_commands() {
        let mut form = QueryParams::default();
        assert_eq!(
            parse_line(&mut form, "PDF").unwrap(),
            FormCommand::Export(ExportFormat::Pdf)
        );
        assert_eq!(parse_line(&mut form, "quit").unwrap(), FormCommand::Quit);
        assert_eq!(parse_line(&mut form, "show").unwrap(), FormCommand::Show);
    }

    #[test]
    fn bad_input_is_a_validation_error() {
        let mut form = QueryParams::default();
        assert!(parse_line(&mut form, "colour=blue").is_err());
        assert!(parse_line(&mut form, "just words").is_err());
    }
}
