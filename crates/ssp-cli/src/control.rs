//! # Control Subcommand
//!
//! `ssp control parse` canonicalizes one identifier and reports every
//! rendering of it.

use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use serde::Serialize;
use ssp_core::{ControlId, RenderForm};

/// Arguments for the `ssp control` subcommand.
#[derive(Args, Debug)]
pub struct ControlArgs {
    /// Operation to run.
    #[command(subcommand)]
    pub command: ControlCommand,
}

/// Control identifier operations.
#[derive(Subcommand, Debug)]
pub enum ControlCommand {
    /// Parse an identifier in any accepted spelling.
    Parse {
        /// Identifier text, e.g. `AC-2(1)`, `ac.2.1`, `AC 2`.
        text: String,
        /// Rendering used for the `rendered` field.
        #[arg(long, value_enum, default_value_t = FormArg::Hyphenated)]
        form: FormArg,
    },
}

/// Command-line spelling of [`RenderForm`].
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormArg {
    /// `ac.2.1`
    Dotted,
    /// `AC-2(1)`
    Hyphenated,
}

impl From<FormArg> for RenderForm {
    fn from(form: FormArg) -> Self {
        match form {
            FormArg::Dotted => RenderForm::Dotted,
            FormArg::Hyphenated => RenderForm::Hyphenated,
        }
    }
}

/// Result of `ssp control parse`.
#[derive(Debug, Serialize)]
pub struct ParsedControl {
    /// Text exactly as supplied.
    pub input: String,
    /// Name of the grammar that matched.
    pub grammar: &'static str,
    /// Upper-case family code.
    pub family: String,
    /// Base control number.
    pub number: u32,
    /// Enhancement number, if any.
    pub enhancement: Option<u32>,
    /// Rendering in the requested form.
    pub rendered: String,
    /// `AC-2(1)` rendering.
    pub hyphenated: String,
    /// `ac.2.1` rendering.
    pub dotted: String,
    /// OSCAL `ac-2.1` rendering.
    pub oscal: String,
}

/// Parse `text` and describe the canonical identifier.
pub fn describe(text: &str, form: RenderForm) -> Result<ParsedControl> {
    let (id, grammar) = ControlId::parse_with_grammar(text)?;
    Ok(ParsedControl {
        input: text.to_string(),
        grammar: grammar.name(),
        family: id.family().to_string(),
        number: id.number(),
        enhancement: id.enhancement(),
        rendered: id.render(form),
        hyphenated: id.render(RenderForm::Hyphenated),
        dotted: id.render(RenderForm::Dotted),
        oscal: id.to_oscal(),
    })
}

/// Execute the control subcommand.
pub fn run_control(args: &ControlArgs) -> Result<u8> {
    match &args.command {
        ControlCommand::Parse { text, form } => {
            crate::print_json(&describe(text, (*form).into())?)?;
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_dotted_enhancement() {
        let parsed = describe("ac.2.1", RenderForm::Dotted).unwrap();
        assert_eq!(parsed.grammar, "dotted");
        assert_eq!(parsed.family, "AC");
        assert_eq!(parsed.number, 2);
        assert_eq!(parsed.enhancement, Some(1));
        assert_eq!(parsed.rendered, "AC.2.1");
        assert_eq!(parsed.hyphenated, "AC-2(1)");
        assert_eq!(parsed.oscal, "ac-2.1");
    }

    #[test]
    fn test_describe_base_control() {
        let parsed = describe("SI 4", RenderForm::Hyphenated).unwrap();
        assert_eq!(parsed.grammar, "spaced");
        assert_eq!(parsed.rendered, "SI-4");
        assert_eq!(parsed.dotted, "SI.4");
        assert_eq!(parsed.enhancement, None);
    }

    #[test]
    fn test_describe_malformed_is_error() {
        let err = describe("not a control", RenderForm::Hyphenated).unwrap_err();
        assert!(err.to_string().contains("not a control"));
    }
}
