//! The alphabet: integer-valued symbols plus the distinguished ε value.

use std::fmt;

/// An alphabet symbol or the distinguished ε (empty-string) transition marker.
///
/// Ordinary symbols wrap a byte value (`0..=255`). [`Symbol::EPSILON`] is a
/// sentinel outside that range and is never accepted as matcher input; it
/// only ever appears as a transition key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(i32);

impl Symbol {
    /// The empty-string transition. Never accepted as input by a simulator.
    pub const EPSILON: Symbol = Symbol(-1);

    /// Wraps a literal byte as an ordinary alphabet symbol.
    pub const fn byte(b: u8) -> Symbol {
        Symbol(b as i32)
    }

    /// `true` for [`Symbol::EPSILON`].
    pub const fn is_epsilon(self) -> bool {
        self.0 == Self::EPSILON.0
    }

    /// The raw integer value, matching the source's `SYMBOL` representation.
    pub const fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_epsilon() {
            write!(f, "ε")
        } else if let Ok(b) = u8::try_from(self.0) {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)
            } else {
                write!(f, "\\x{:02x}", b)
            }
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Named character-class payloads (`\s`, `\d`, `\w`), expanded to sets of
/// ordinary symbols at AST-emit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClassSymbol {
    Whitespace,
    Digit,
    Word,
}

impl ClassSymbol {
    /// Every byte this class expands to. Matches the usual POSIX-style
    /// ASCII sets: `\s` = `[ \t\n\r\x0b\x0c]`, `\d` = `[0-9]`,
    /// `\w` = `[0-9A-Za-z_]`.
    pub fn expand(self) -> Vec<Symbol> {
        match self {
            ClassSymbol::Whitespace => b" \t\n\r\x0b\x0c".iter().map(|&b| Symbol::byte(b)).collect(),
            ClassSymbol::Digit => (b'0'..=b'9').map(Symbol::byte).collect(),
            ClassSymbol::Word => (b'0'..=b'9')
                .chain(b'A'..=b'Z')
                .chain(b'a'..=b'z')
                .chain(std::iter::once(b'_'))
                .map(Symbol::byte)
                .collect(),
        }
    }
}

impl fmt::Display for ClassSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            ClassSymbol::Whitespace => 's',
            ClassSymbol::Digit => 'd',
            ClassSymbol::Word => 'w',
        };
        write!(f, "\\{c}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epsilon_is_not_a_byte() {
        assert!(Symbol::EPSILON.is_epsilon());
        assert!(!Symbol::byte(b'a').is_epsilon());
    }

    #[test]
    fn class_symbol_expand() {
        assert_eq!(ClassSymbol::Digit.expand().len(), 10);
        assert_eq!(ClassSymbol::Word.expand().len(), 10 + 26 + 26 + 1);
        assert!(ClassSymbol::Whitespace.expand().contains(&Symbol::byte(b' ')));
    }
}
