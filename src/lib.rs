pub mod cursor;
pub mod error;
pub mod eval;
pub mod harness;
pub mod repl;
pub mod symbols;

pub use cursor::Cursor;
pub use error::{ErrorKind, ParseError, SourceError};
pub use eval::{Calc, MAX_DEPTH, evaluate};
pub use symbols::{Function, SymbolTable};
