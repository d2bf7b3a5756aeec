//! Error interface for this crate.
//!
//! Every stage of the pipeline has its own error kind:
//! - [`TokenizeErr`]: errors raised while splitting the raw instruction
//! - [`LexErr`]: errors raised while lexing a single operand
//! - [`ParseErr`]: errors raised while looking up the mnemonic and parsing operands
//! - [`ConvertErr`]: errors raised while encoding operands into bits
//!
//! [`interpret`] reports any of these through [`MipsErr`],
//! which tags the error with the [`Stage`] it came from.
//!
//! [`interpret`]: crate::interpret
use std::borrow::Cow;

pub use crate::asm::ConvertErr;
pub use crate::parse::lex::LexErr;
pub use crate::parse::{ParseErr, TokenizeErr};

/// Unified error interface for all errors in this crate.
///
/// Note that the [`std::fmt::Display`] implementation is used for the brief message,
/// and [`Error::help`] is used for any hints on how to fix the input.
pub trait Error: std::error::Error {
    /// The pipeline stage this error belongs to.
    fn stage(&self) -> Stage;

    /// A help message to display alongside the error.
    fn help(&self) -> Option<Cow<'_, str>> {
        None
    }

    /// Whether this error signals a bug in the encoder rather than bad input.
    fn is_internal(&self) -> bool {
        false
    }
}

/// The stage of the pipeline where an error occurred.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Stage {
    /// Splitting raw text into mnemonic and operands.
    Tokenization,
    /// Looking up the mnemonic and parsing its operands.
    Parsing,
    /// Encoding operands into bit fields and rendering the word.
    Conversion,
}
impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Tokenization => f.write_str("tokenization"),
            Stage::Parsing      => f.write_str("parsing"),
            Stage::Conversion   => f.write_str("conversion"),
        }
    }
}

/// An error from [`interpret`], tagged by the stage that produced it.
///
/// [`interpret`]: crate::interpret
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum MipsErr {
    #[allow(missing_docs)]
    Tokenize(TokenizeErr),
    #[allow(missing_docs)]
    Parse(ParseErr),
    #[allow(missing_docs)]
    Convert(ConvertErr),
}
impl MipsErr {
    /// The human-readable message of this error.
    pub fn message(&self) -> String {
        self.to_string()
    }

    fn inner(&self) -> &dyn Error {
        match self {
            MipsErr::Tokenize(e) => e,
            MipsErr::Parse(e)    => e,
            MipsErr::Convert(e)  => e,
        }
    }
}
impl std::fmt::Display for MipsErr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self.inner(), f)
    }
}
impl std::error::Error for MipsErr {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MipsErr::Tokenize(e) => Some(e),
            MipsErr::Parse(e)    => Some(e),
            MipsErr::Convert(e)  => Some(e),
        }
    }
}
impl Error for MipsErr {
    fn stage(&self) -> Stage {
        self.inner().stage()
    }

    fn help(&self) -> Option<Cow<'_, str>> {
        self.inner().help()
    }

    fn is_internal(&self) -> bool {
        self.inner().is_internal()
    }
}
impl From<TokenizeErr> for MipsErr {
    fn from(value: TokenizeErr) -> Self {
        MipsErr::Tokenize(value)
    }
}
impl From<ParseErr> for MipsErr {
    fn from(value: ParseErr) -> Self {
        MipsErr::Parse(value)
    }
}
impl From<ConvertErr> for MipsErr {
    fn from(value: ConvertErr) -> Self {
        MipsErr::Convert(value)
    }
}
