//! Symbol alphabet
//!
//! The alphabet is closed: ids 0..=16, of which two are wild, one is the
//! scatter, ten pay, and the rest are reserved blanks that never pay.

use serde::{Deserialize, Serialize};

use crate::error::RtpError;

/// Number of symbol ids, including reserved ones
pub const SYMBOL_COUNT: usize = 17;

/// Symbol classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SymbolKind {
    /// Regular paying symbol
    Pay,
    /// Substitutes for the paying symbol anchoring a line
    Wild,
    /// Counted anywhere on the grid, never part of a line
    Scatter,
    /// Unused id, pays nothing
    Reserved,
}

/// A symbol id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Symbol {
    Blank = 0,
    /// Wild that lands on the strips and that expansion produces
    Wild = 1,
    /// Second wild id; substitutes like `Wild`, refused on strips at load
    SyntheticWild = 2,
    Sym03 = 3,
    Sym04 = 4,
    Sym05 = 5,
    Sym06 = 6,
    Sym07 = 7,
    Sym08 = 8,
    Sym09 = 9,
    Sym10 = 10,
    Sym11 = 11,
    Sym12 = 12,
    Reserved13 = 13,
    Reserved14 = 14,
    Reserved15 = 15,
    Scatter = 16,
}

impl Symbol {
    /// All ids in ascending order
    pub const ALL: [Symbol; SYMBOL_COUNT] = [
        Symbol::Blank,
        Symbol::Wild,
        Symbol::SyntheticWild,
        Symbol::Sym03,
        Symbol::Sym04,
        Symbol::Sym05,
        Symbol::Sym06,
        Symbol::Sym07,
        Symbol::Sym08,
        Symbol::Sym09,
        Symbol::Sym10,
        Symbol::Sym11,
        Symbol::Sym12,
        Symbol::Reserved13,
        Symbol::Reserved14,
        Symbol::Reserved15,
        Symbol::Scatter,
    ];

    /// Numeric id
    #[inline]
    pub fn id(self) -> u8 {
        self as u8
    }

    /// Index into dense per-symbol tables
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn kind(self) -> SymbolKind {
        match self {
            Symbol::Wild | Symbol::SyntheticWild => SymbolKind::Wild,
            Symbol::Scatter => SymbolKind::Scatter,
            Symbol::Blank | Symbol::Reserved13 | Symbol::Reserved14 | Symbol::Reserved15 => {
                SymbolKind::Reserved
            }
            _ => SymbolKind::Pay,
        }
    }

    #[inline]
    pub fn is_wild(self) -> bool {
        matches!(self, Symbol::Wild | Symbol::SyntheticWild)
    }

    #[inline]
    pub fn is_scatter(self) -> bool {
        self == Symbol::Scatter
    }

    /// Whether the paytable may hold non-zero entries for this id
    pub fn can_pay(self) -> bool {
        matches!(self.kind(), SymbolKind::Pay | SymbolKind::Wild)
    }

    /// Display name ("SYM07", "WILD", ...)
    pub fn name(self) -> &'static str {
        match self {
            Symbol::Blank => "BLANK",
            Symbol::Wild => "WILD",
            Symbol::SyntheticWild => "WILD2",
            Symbol::Sym03 => "SYM03",
            Symbol::Sym04 => "SYM04",
            Symbol::Sym05 => "SYM05",
            Symbol::Sym06 => "SYM06",
            Symbol::Sym07 => "SYM07",
            Symbol::Sym08 => "SYM08",
            Symbol::Sym09 => "SYM09",
            Symbol::Sym10 => "SYM10",
            Symbol::Sym11 => "SYM11",
            Symbol::Sym12 => "SYM12",
            Symbol::Reserved13 => "RSV13",
            Symbol::Reserved14 => "RSV14",
            Symbol::Reserved15 => "RSV15",
            Symbol::Scatter => "SCATTER",
        }
    }
}

impl TryFrom<u8> for Symbol {
    type Error = RtpError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Symbol::ALL
            .get(id as usize)
            .copied()
            .ok_or(RtpError::UnknownSymbol(id))
    }
}

impl From<Symbol> for u8 {
    fn from(symbol: Symbol) -> u8 {
        symbol.id()
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip_through_table() {
        for (i, symbol) in Symbol::ALL.iter().enumerate() {
            assert_eq!(symbol.index(), i);
            assert_eq!(Symbol::try_from(i as u8).unwrap(), *symbol);
        }
    }

    #[test]
    fn test_unknown_id_rejected() {
        assert!(matches!(Symbol::try_from(17), Err(RtpError::UnknownSymbol(17))));
    }

    #[test]
    fn test_kinds() {
        assert!(Symbol::Wild.is_wild());
        assert!(Symbol::SyntheticWild.is_wild());
        assert!(Symbol::Scatter.is_scatter());
        assert_eq!(Symbol::Sym07.kind(), SymbolKind::Pay);
        assert_eq!(Symbol::Reserved14.kind(), SymbolKind::Reserved);
        assert!(!Symbol::Blank.can_pay());
        assert!(!Symbol::Scatter.can_pay());
        assert!(Symbol::Wild.can_pay());
    }

    #[test]
    fn test_serde_as_id() {
        let json = serde_json::to_string(&Symbol::Scatter).unwrap();
        assert_eq!(json, "16");
        let parsed: Symbol = serde_json::from_str("7").unwrap();
        assert_eq!(parsed, Symbol::Sym07);
        assert!(serde_json::from_str::<Symbol>("99").is_err());
    }
}
