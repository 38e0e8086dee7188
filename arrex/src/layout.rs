//! Layout descriptor (C1): parses a compact packed-layout string into a
//! byte size. Ported from the format-string parser this crate derives
//! from, cut down to the flat alphabet spec.md §3/§6 actually uses: no
//! repeat counts, no byte-order modifiers, just a sequence of codes.

use pest::Parser;

use crate::error::{ArrexError, Result};

#[derive(pest_derive::Parser)]
#[grammar = "fmt.pest"]
struct FmtParser;

/// One format character and the number of bytes it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    F16,
    Pad,
}

impl Code {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'b' => Code::I8,
            'B' => Code::U8,
            'h' => Code::I16,
            'H' => Code::U16,
            'i' => Code::I32,
            'I' => Code::U32,
            'l' => Code::I64,
            'L' => Code::U64,
            'q' => Code::I64,
            'Q' => Code::U64,
            'f' => Code::F32,
            'd' => Code::F64,
            'e' => Code::F16,
            'x' => Code::Pad,
            _ => return None,
        })
    }

    /// Byte width of this code. No alignment is applied: callers who need
    /// machine-word alignment add explicit `x` padding (spec.md §4.1).
    pub fn size(self) -> usize {
        match self {
            Code::I8 | Code::U8 | Code::Pad => 1,
            Code::I16 | Code::U16 | Code::F16 => 2,
            Code::I32 | Code::U32 | Code::F32 => 4,
            Code::I64 | Code::U64 | Code::F64 => 8,
        }
    }
}

/// Parses `layout` into its sequence of format codes. Rejects unknown
/// codes with `ArrexError::Layout`.
pub fn parse(layout: &str) -> Result<Vec<Code>> {
    let pairs = FmtParser::parse(Rule::fmt, layout)
        .map_err(|e| ArrexError::Layout(layout.to_owned(), e.to_string()))?;
    let mut codes = Vec::new();
    for pair in pairs {
        for inner in pair.into_inner() {
            if inner.as_rule() == Rule::char {
                let c = inner.as_str().chars().next().unwrap();
                codes.push(Code::from_char(c).expect("grammar only emits known chars"));
            }
        }
    }
    Ok(codes)
}

/// Byte size of one element described by `layout`.
pub fn size_of(layout: &str) -> Result<usize> {
    Ok(parse(layout)?.iter().map(|c| c.size()).sum())
}

/// Whether `layout` is a syntactically valid layout string.
pub fn is_valid(layout: &str) -> bool {
    parse(layout).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(size_of("h").unwrap(), 2);
        assert_eq!(size_of("dddd").unwrap(), 32);
        assert_eq!(size_of("fxBh").unwrap(), 4 + 1 + 1 + 2);
        assert_eq!(size_of("").unwrap(), 0);
    }

    #[test]
    fn rejects_unknown_codes() {
        assert!(!is_valid("v"));
        assert!(!is_valid("d?"));
        assert!(is_valid("bBhHiIlLqQfdex"));
    }

    #[test]
    fn codes_preserved_in_order() {
        let codes = parse("fxBh").unwrap();
        assert_eq!(
            codes,
            vec![Code::F32, Code::Pad, Code::U8, Code::I16]
        );
    }
}
