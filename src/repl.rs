use std::io::{BufRead, Write};

use miette::{IntoDiagnostic, Result};

use crate::{eval::Calc, symbols::SymbolTable};

pub const DEFAULT_PROMPT: &str = ">> ";

/// Line-at-a-time read-eval-print loop.
pub struct Repl<'a> {
    prompt: &'a str,
    symbols: &'a SymbolTable,
}

impl<'a> Repl<'a> {
    pub fn new(prompt: &'a str) -> Self {
        Repl {
            prompt,
            symbols: SymbolTable::standard(),
        }
    }

    pub fn with_symbols(prompt: &'a str, symbols: &'a SymbolTable) -> Self {
        Repl { prompt, symbols }
    }

    /// Runs until an empty line or end of input. Failures are printed with
    /// the caret under the offending character, past the prompt.
    pub fn run(&self, mut input: impl BufRead, mut output: impl Write) -> Result<()> {
        writeln!(output, "Type an expression and press return to evaluate.").into_diagnostic()?;
        writeln!(output, "Enter an empty line to exit.").into_diagnostic()?;

        let indent = self.prompt.chars().count();
        let mut line = String::new();
        loop {
            write!(output, "{}", self.prompt).into_diagnostic()?;
            output.flush().into_diagnostic()?;

            line.clear();
            if input.read_line(&mut line).into_diagnostic()? == 0 {
                break;
            }
            let source = line.trim_end_matches(['\n', '\r']);
            if source.is_empty() {
                break;
            }

            match Calc::with_symbols(source, self.symbols).evaluate() {
                Ok(value) => writeln!(output, "{value}").into_diagnostic()?,
                Err(e) => writeln!(output, "{}", e.render_indented(indent)).into_diagnostic()?,
            }
        }
        Ok(())
    }
}
