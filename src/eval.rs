use log::{debug, trace};

use crate::{
    cursor::Cursor,
    error::{ErrorKind, ParseError},
    symbols::SymbolTable,
};

/// Evaluates `source` against the standard symbol table.
pub fn evaluate(source: &str) -> Result<f64, ParseError> {
    Calc::new(source).evaluate()
}

/// Single-pass evaluator: every production computes its value while it
/// recognises its input, so no tree is ever built.
///
/// ```text
/// EXPRESSION := SUM <end>
/// SUM        := PRODUCT [ ('+' | '-') PRODUCT ]
/// PRODUCT    := TERM [ ('*' | '/') SUM ]
/// TERM       := '(' SUM ')' | CONSTANT | IDENTIFIER
/// IDENTIFIER := SYMBOL [ '(' SUM ')' ]
/// CONSTANT   := ['+' | '-'] DIGIT* ['.' DIGIT*] [('e' | 'E') ['+' | '-'] DIGIT+]
/// SYMBOL     := ALPHA ALNUM*
/// ```
///
/// A sum takes at most one operator, so `1+2+3` is rejected at the second
/// `+`. The right operand of `*` and `/` is a whole sum, so `2*3+4` is
/// `2*(3+4)`.
pub struct Calc<'de> {
    whole: &'de str,
    cursor: Cursor<'de>,
    symbols: &'de SymbolTable,
    depth: usize,
}

/// Deepest chain of nested sums (parentheses, function arguments and
/// right operands of `*` and `/`) accepted before evaluation gives up.
pub const MAX_DEPTH: usize = 256;

impl<'de> Calc<'de> {
    pub fn new(whole: &'de str) -> Self {
        Self::with_symbols(whole, SymbolTable::standard())
    }

    pub fn with_symbols(whole: &'de str, symbols: &'de SymbolTable) -> Self {
        Calc {
            whole,
            cursor: Cursor::new(whole),
            symbols,
            depth: 0,
        }
    }

    pub fn evaluate(mut self) -> Result<f64, ParseError> {
        let result = self.parse_expression();
        match &result {
            Ok(value) => debug!("{:?} => {value}", self.whole),
            Err(e) => debug!("{:?} failed at {}: {e}", self.whole, e.position()),
        }
        result
    }

    fn error(&self, kind: ErrorKind) -> ParseError {
        ParseError::new(kind, self.cursor.position())
    }

    fn parse_expression(&mut self) -> Result<f64, ParseError> {
        let value = self.parse_sum()?;

        self.cursor.skip_whitespace();
        if self.cursor.peek().is_some() {
            return Err(self.error(ErrorKind::UnexpectedTrailingInput));
        }
        Ok(value)
    }

    fn parse_sum(&mut self) -> Result<f64, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(self.error(ErrorKind::NestingTooDeep(MAX_DEPTH)));
        }
        self.depth += 1;
        let value = self.parse_sum_within();
        self.depth -= 1;
        value
    }

    fn parse_sum_within(&mut self) -> Result<f64, ParseError> {
        trace!("sum at {}, depth {}", self.cursor.position(), self.depth);
        let lhs = self.parse_product()?;

        self.cursor.skip_whitespace();
        match self.cursor.peek() {
            Some('+') => {
                self.cursor.advance();
                Ok(lhs + self.parse_product()?)
            }
            Some('-') => {
                self.cursor.advance();
                Ok(lhs - self.parse_product()?)
            }
            _ => Ok(lhs),
        }
    }

    fn parse_product(&mut self) -> Result<f64, ParseError> {
        trace!("product at {}", self.cursor.position());
        let lhs = self.parse_term()?;

        self.cursor.skip_whitespace();
        match self.cursor.peek() {
            Some('*') => {
                self.cursor.advance();
                Ok(lhs * self.parse_sum()?)
            }
            Some('/') => {
                self.cursor.advance();
                Ok(lhs / self.parse_sum()?)
            }
            _ => Ok(lhs),
        }
    }

    fn parse_term(&mut self) -> Result<f64, ParseError> {
        self.cursor.skip_whitespace();
        trace!("term at {}", self.cursor.position());

        match self.cursor.peek() {
            Some('(') => {
                self.cursor.advance();
                let value = self.parse_sum()?;
                self.cursor.skip_whitespace();
                self.cursor.expect(')')?;
                Ok(value)
            }
            Some(c) if starts_constant(c) => self.parse_constant(),
            Some(c) if c.is_ascii_alphabetic() => self.parse_identifier(),
            _ => Err(self.error(ErrorKind::ExpectedOperand)),
        }
    }

    fn parse_identifier(&mut self) -> Result<f64, ParseError> {
        let symbol = self.parse_symbol()?;

        self.cursor.skip_whitespace();
        if self.cursor.peek() == Some('(') {
            let Some(function) = self.symbols.function(symbol) else {
                return Err(self.error(ErrorKind::UnknownFunction(symbol.to_string())));
            };
            self.cursor.expect('(')?;
            let argument = self.parse_sum()?;
            self.cursor.skip_whitespace();
            self.cursor.expect(')')?;
            trace!("{function}({argument})");
            Ok(function.apply(argument))
        } else {
            self.symbols
                .constant(symbol)
                .ok_or_else(|| self.error(ErrorKind::UnknownSymbol(symbol.to_string())))
        }
    }

    /// Gathers the longest run that may form a float, then hands it to
    /// `f64::from_str`. At least one of the two mantissa digit runs must be
    /// non-empty, which the conversion enforces.
    fn parse_constant(&mut self) -> Result<f64, ParseError> {
        self.cursor.skip_whitespace();
        let start = self.cursor.position();
        let start_byte = self.cursor.byte();

        if self.cursor.peek_is(|c| matches!(c, '+' | '-')) {
            self.cursor.advance();
        }
        self.cursor.advance_while(|c| c.is_ascii_digit());

        if self.cursor.peek() == Some('.') {
            self.cursor.advance();
            self.cursor.advance_while(|c| c.is_ascii_digit());
        }

        if self.cursor.peek_is(|c| matches!(c, 'e' | 'E')) {
            self.cursor.advance();
            if self.cursor.peek_is(|c| matches!(c, '+' | '-')) {
                self.cursor.advance();
            }
            if !self.cursor.peek_is(|c| c.is_ascii_digit()) {
                return Err(self.error(ErrorKind::MissingExponentDigits));
            }
            self.cursor.advance_while(|c| c.is_ascii_digit());
        }

        let literal = self.cursor.since(start_byte);
        literal.parse().map_err(|_| {
            ParseError::new(ErrorKind::InvalidNumericLiteral(literal.to_string()), start)
        })
    }

    fn parse_symbol(&mut self) -> Result<&'de str, ParseError> {
        self.cursor.skip_whitespace();
        if !self.cursor.peek_is(|c| c.is_ascii_alphabetic()) {
            return Err(self.error(ErrorKind::ExpectedOperand));
        }
        Ok(self.cursor.advance_while(|c| c.is_ascii_alphanumeric()))
    }
}

fn starts_constant(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '+' | '-' | '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::Function;

    fn error_of(source: &str) -> (ErrorKind, usize) {
        let e = evaluate(source).unwrap_err();
        (e.kind().clone(), e.position())
    }

    #[test]
    fn constants() {
        assert_eq!(evaluate("1"), Ok(1.0));
        assert_eq!(evaluate("1.234"), Ok(1.234));
        assert_eq!(evaluate(".1"), Ok(0.1));
        assert_eq!(evaluate("1."), Ok(1.0));
        assert_eq!(evaluate("-2"), Ok(-2.0));
        assert_eq!(evaluate("+2"), Ok(2.0));
        assert_eq!(evaluate("-.1"), Ok(-0.1));
        assert_eq!(evaluate("1e9"), Ok(1e9));
        assert_eq!(evaluate("2E-8"), Ok(2e-8));
        assert_eq!(evaluate("3e+7"), Ok(3e+7));
        assert_eq!(evaluate("456.789e+5"), Ok(456.789e+5));
    }

    #[test]
    fn degenerate_literals() {
        for source in ["-", "+", ".", "-.", "+."] {
            assert_eq!(
                error_of(source),
                (ErrorKind::InvalidNumericLiteral(source.to_string()), 0),
                "{source}"
            );
        }
        assert_eq!(
            error_of("1+ -"),
            (ErrorKind::InvalidNumericLiteral("-".to_string()), 3)
        );
    }

    #[test]
    fn exponent_needs_digits() {
        assert_eq!(error_of("1e"), (ErrorKind::MissingExponentDigits, 2));
        assert_eq!(error_of("1e+"), (ErrorKind::MissingExponentDigits, 3));
        assert_eq!(error_of("2.5E-x"), (ErrorKind::MissingExponentDigits, 5));
    }

    #[test]
    fn sum_takes_a_single_operator() {
        assert_eq!(evaluate("1+2"), Ok(3.0));
        assert_eq!(evaluate("4-5"), Ok(-1.0));
        assert_eq!(error_of("1+2+3"), (ErrorKind::UnexpectedTrailingInput, 3));
        assert_eq!(error_of("1 - 2 - 3"), (ErrorKind::UnexpectedTrailingInput, 6));
    }

    #[test]
    fn product_right_operand_is_a_sum() {
        assert_eq!(evaluate("2*3"), Ok(6.0));
        assert_eq!(evaluate("2*3+4"), Ok(14.0));
        assert_eq!(evaluate("8/2+2"), Ok(2.0));
        assert_eq!(evaluate("2+3*4"), Ok(14.0));
        assert_eq!(evaluate("2*3*4"), Ok(24.0));
    }

    #[test]
    fn sign_only_through_constants() {
        assert_eq!(evaluate("1+-2"), Ok(-1.0));
        assert_eq!(evaluate("2*-3"), Ok(-6.0));
        assert_eq!(error_of("-pi"), (ErrorKind::InvalidNumericLiteral("-".into()), 0));
        assert_eq!(error_of("-(1)"), (ErrorKind::InvalidNumericLiteral("-".into()), 0));
    }

    #[test]
    fn parentheses() {
        assert_eq!(evaluate("(3+4)"), Ok(7.0));
        assert_eq!(evaluate("((1))"), Ok(1.0));
        assert_eq!(evaluate("(1+2)+(3+4)"), Ok(10.0));
        assert_eq!(error_of("(1+2"), (ErrorKind::UnexpectedCharacter(')'), 4));
        assert_eq!(error_of("(1+2]"), (ErrorKind::UnexpectedCharacter(')'), 4));
        assert_eq!(error_of(")"), (ErrorKind::ExpectedOperand, 0));
    }

    #[test]
    fn identifiers() {
        assert_eq!(evaluate("e"), Ok(1f64.exp()));
        assert_eq!(evaluate("sqrt(4)"), Ok(2.0));
        assert_eq!(evaluate("sqrt (16)"), Ok(4.0));
        assert_eq!(evaluate("abs(-3)"), Ok(3.0));
        assert!(evaluate("sqrt(-1)").unwrap().is_nan());
        assert_eq!(error_of("foo(1)"), (ErrorKind::UnknownFunction("foo".into()), 3));
        assert_eq!(error_of("pi(1)"), (ErrorKind::UnknownFunction("pi".into()), 2));
        assert_eq!(error_of("bar"), (ErrorKind::UnknownSymbol("bar".into()), 3));
        assert_eq!(error_of("sqrt"), (ErrorKind::UnknownSymbol("sqrt".into()), 4));
        assert_eq!(error_of("sqrt(4"), (ErrorKind::UnexpectedCharacter(')'), 6));
    }

    #[test]
    fn symbols_are_alphanumeric() {
        let table = SymbolTable::empty()
            .with_constant("x2", 5.0)
            .with_function("f1", Function::Abs);
        assert_eq!(Calc::with_symbols("x2", &table).evaluate(), Ok(5.0));
        assert_eq!(
            Calc::with_symbols("f1(-x2)", &table).evaluate().unwrap_err().kind(),
            &ErrorKind::InvalidNumericLiteral("-".into())
        );
        assert_eq!(Calc::with_symbols("f1(0-x2)", &table).evaluate(), Ok(5.0));
        assert_eq!(
            Calc::with_symbols("x_2", &table).evaluate().unwrap_err().kind(),
            &ErrorKind::UnknownSymbol("x".into())
        );
    }

    #[test]
    fn empty_and_blank_input() {
        assert_eq!(error_of(""), (ErrorKind::ExpectedOperand, 0));
        assert_eq!(error_of("   "), (ErrorKind::ExpectedOperand, 3));
        assert_eq!(error_of("1+"), (ErrorKind::ExpectedOperand, 2));
    }

    #[test]
    fn trailing_input() {
        assert_eq!(error_of("2 3"), (ErrorKind::UnexpectedTrailingInput, 2));
        assert_eq!(error_of("2pi"), (ErrorKind::UnexpectedTrailingInput, 1));
        assert_eq!(error_of("1)"), (ErrorKind::UnexpectedTrailingInput, 1));
        assert_eq!(evaluate("1 \n"), Ok(1.0));
    }

    #[test]
    fn nesting_is_bounded() {
        let source = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(
            error_of(&source),
            (ErrorKind::NestingTooDeep(MAX_DEPTH), MAX_DEPTH)
        );

        let source = format!("{}2", "2*".repeat(10_000));
        assert_eq!(
            error_of(&source),
            (ErrorKind::NestingTooDeep(MAX_DEPTH), 2 * MAX_DEPTH)
        );

        let source = format!("{}1{}", "sqrt(".repeat(10_000), ")".repeat(10_000));
        assert_eq!(
            error_of(&source),
            (ErrorKind::NestingTooDeep(MAX_DEPTH), 5 * MAX_DEPTH)
        );
    }

    #[test]
    fn nesting_up_to_the_limit_evaluates() {
        let inner = MAX_DEPTH - 1;
        let source = format!("{}1{}", "(".repeat(inner), ")".repeat(inner));
        assert_eq!(evaluate(&source), Ok(1.0));

        let source = format!("{}2", "1*".repeat(inner));
        assert_eq!(evaluate(&source), Ok(2.0));
    }

    #[test]
    fn custom_tables_replace_the_standard_one() {
        let table = SymbolTable::empty().with_function("sin", Function::Cos);
        assert_eq!(Calc::with_symbols("sin(0)", &table).evaluate(), Ok(1.0));
        assert_eq!(
            Calc::with_symbols("pi", &table).evaluate().unwrap_err().kind(),
            &ErrorKind::UnknownSymbol("pi".into())
        );
    }
}
