use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Every way an evaluation can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[error("Syntax error: unexpected input after the end of the expression.")]
    UnexpectedTrailingInput,
    #[error("Expected a number, symbol or parenthesized expression.")]
    ExpectedOperand,
    #[error("Unknown function \"{0}\".")]
    UnknownFunction(String),
    #[error("Unknown symbol \"{0}\".")]
    UnknownSymbol(String),
    #[error("Expected exponent in floating point constant.")]
    MissingExponentDigits,
    #[error("Invalid numeric literal \"{0}\".")]
    InvalidNumericLiteral(String),
    #[error("Expected '{0}'.")]
    UnexpectedCharacter(char),
    #[error("Expression nested more than {0} levels deep.")]
    NestingTooDeep(usize),
}

impl ErrorKind {
    pub fn help(&self) -> Option<String> {
        match self {
            ErrorKind::UnexpectedTrailingInput => Some(
                "only one `+`/`-` is allowed per sum, wrap further terms in parentheses".into(),
            ),
            ErrorKind::ExpectedOperand => None,
            ErrorKind::UnknownFunction(name) => {
                Some(format!("`{name}` is not one of the built-in functions"))
            }
            ErrorKind::UnknownSymbol(name) => {
                Some(format!("`{name}` is not one of the built-in constants"))
            }
            ErrorKind::MissingExponentDigits => Some("add digits after the exponent marker".into()),
            ErrorKind::InvalidNumericLiteral(_) => {
                Some("a number needs at least one digit before or after the `.`".into())
            }
            ErrorKind::UnexpectedCharacter(expected) => {
                Some(format!("insert `{expected}` here"))
            }
            ErrorKind::NestingTooDeep(_) => {
                Some("split the expression or remove redundant parentheses".into())
            }
        }
    }
}

/// Failure of a single evaluation.
///
/// `position` is a character offset into the evaluated source. The error does
/// not keep the source around; callers that want a labelled report hand it
/// back through [`ParseError::with_source_code`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct ParseError {
    kind: ErrorKind,
    position: usize,
}

impl ParseError {
    pub fn new(kind: ErrorKind, position: usize) -> Self {
        ParseError { kind, position }
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Caret line followed by the message, e.g.
    ///
    /// ```text
    ///    ^
    /// error (position = 3): Syntax error: ...
    /// ```
    pub fn render(&self) -> String {
        self.render_indented(0)
    }

    /// Like [`ParseError::render`], with the caret shifted right by `indent`
    /// columns so it lines up under input echoed after a prompt.
    pub fn render_indented(&self, indent: usize) -> String {
        format!(
            "{}^\nerror (position = {}): {}",
            " ".repeat(indent + self.position),
            self.position,
            self.kind
        )
    }

    pub fn with_source_code(self, name: &str, source: &str) -> SourceError {
        // Past the end, point at the last character so the label is drawn.
        let (start, len) = match source.char_indices().nth(self.position) {
            Some((byte, c)) => (byte, c.len_utf8()),
            None => match source.char_indices().next_back() {
                Some((byte, c)) => (byte, c.len_utf8()),
                None => (0, 0),
            },
        };
        SourceError {
            src: NamedSource::new(name, source.to_string()),
            bad_bit: SourceSpan::from(start..start + len),
            help: self.kind.help(),
            error: self,
        }
    }
}

#[derive(Error, Debug, Diagnostic)]
#[error("{error}")]
#[diagnostic(code(calc::parse))]
pub struct SourceError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    bad_bit: SourceSpan,

    #[help]
    help: Option<String>,

    pub error: ParseError,
}

impl SourceError {
    pub fn span(&self) -> SourceSpan {
        self.bad_bit
    }
}
