use std::io::Write;

use miette::{IntoDiagnostic, Result};

use crate::eval::evaluate;

pub struct Case {
    pub input: &'static str,
    pub expected: f64,
}

impl Case {
    fn new(input: &'static str, expected: f64) -> Self {
        Case { input, expected }
    }

    /// Prints one report line; the result must match bit for bit.
    pub fn run(&self, mut output: impl Write) -> Result<bool> {
        write!(output, "\"{}\" ==> ", self.input.escape_debug()).into_diagnostic()?;
        let passed = match evaluate(self.input) {
            Ok(value) if value == self.expected => {
                write!(output, "{value} OK").into_diagnostic()?;
                true
            }
            Ok(value) => {
                write!(output, "{value} FAILED: expected {}", self.expected).into_diagnostic()?;
                false
            }
            Err(e) => {
                write!(output, "FAILED: {e}").into_diagnostic()?;
                false
            }
        };
        writeln!(output).into_diagnostic()?;
        Ok(passed)
    }
}

pub fn cases() -> Vec<Case> {
    vec![
        // constants
        Case::new("1", 1.0),
        Case::new("1.234", 1.234),
        Case::new(".1", 0.1),
        Case::new("-2", -2.0),
        Case::new("-.1", -0.1),
        Case::new("1e9", 1e9),
        Case::new("2e-8", 2e-8),
        Case::new("3e+7", 3e+7),
        Case::new("456.789e+5", 456.789e+5),
        // symbols
        Case::new("e", 1f64.exp()),
        Case::new("pi", 1f64.atan() * 4.0),
        Case::new("1+2", 3.0),
        Case::new("3+e", 3.0 + 1f64.exp()),
        Case::new("4-5", -1.0),
        Case::new("2*3", 6.0),
        Case::new("(3+4)", 7.0),
        Case::new("(3+4)*(2+3)", 35.0),
        Case::new("1+-2", -1.0),
        Case::new("\t 1  + ( 2 * 10 )    ", 21.0),
        Case::new("sqrt(4)", 2.0),
        Case::new("sqrt((3+4)*(2+3))", 35f64.sqrt()),
        Case::new("sqrt(1 + 2 )", 3f64.sqrt()),
        Case::new("cos(pi)", -1.0),
        Case::new("sin(0)", 0.0),
    ]
}

/// Runs every built-in case, returning whether all of them passed.
pub fn run(mut output: impl Write) -> Result<bool> {
    writeln!(output, "Running test cases ...").into_diagnostic()?;
    let mut success = true;
    for case in cases() {
        success &= case.run(&mut output)?;
    }
    if success {
        writeln!(output, "All tests succeeded.").into_diagnostic()?;
    } else {
        writeln!(output, "One or more tests failed.").into_diagnostic()?;
    }
    Ok(success)
}
