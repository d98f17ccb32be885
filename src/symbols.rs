use std::{collections::HashMap, fmt::Display, sync::LazyLock};

/// The built-in unary functions.
///
/// Out-of-domain arguments follow IEEE-754 (`sqrt(-1)` is NaN, `ln(0)` is
/// negative infinity) instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Exp,
    Ln,
    Log,
    Abs,
}

impl Function {
    pub const ALL: [Function; 8] = [
        Function::Sin,
        Function::Cos,
        Function::Tan,
        Function::Sqrt,
        Function::Exp,
        Function::Ln,
        Function::Log,
        Function::Abs,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Function::Sin => "sin",
            Function::Cos => "cos",
            Function::Tan => "tan",
            Function::Sqrt => "sqrt",
            Function::Exp => "exp",
            Function::Ln => "ln",
            Function::Log => "log",
            Function::Abs => "abs",
        }
    }

    pub fn apply(self, n: f64) -> f64 {
        match self {
            Function::Sin => n.sin(),
            Function::Cos => n.cos(),
            Function::Tan => n.tan(),
            Function::Sqrt => n.sqrt(),
            Function::Exp => n.exp(),
            Function::Ln => n.ln(),
            Function::Log => n.log10(),
            Function::Abs => n.abs(),
        }
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

static STANDARD: LazyLock<SymbolTable> = LazyLock::new(|| {
    let mut table = SymbolTable::empty()
        .with_constant("e", 1f64.exp())
        .with_constant("pi", 1f64.atan() * 4.0);
    for function in Function::ALL {
        table = table.with_function(function.name(), function);
    }
    table
});

/// Named constants and functions an evaluator may refer to.
///
/// Tables are assembled up front and only read afterwards, so one table can
/// back any number of evaluators.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    constants: HashMap<String, f64>,
    functions: HashMap<String, Function>,
}

impl SymbolTable {
    /// `e`, `pi` and every [`Function`] under its own name.
    pub fn standard() -> &'static SymbolTable {
        &STANDARD
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_constant(mut self, name: impl Into<String>, value: f64) -> Self {
        self.constants.insert(name.into(), value);
        self
    }

    pub fn with_function(mut self, name: impl Into<String>, function: Function) -> Self {
        self.functions.insert(name.into(), function);
        self
    }

    pub fn constant(&self, name: &str) -> Option<f64> {
        self.constants.get(name).copied()
    }

    pub fn function(&self, name: &str) -> Option<Function> {
        self.functions.get(name).copied()
    }
}
