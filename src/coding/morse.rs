//! Morse code table.
//! Maps characters to their dit / dah sequences and groups them the way the trainer offers them.

use indexmap::IndexSet;

/// One element of a Morse character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// The smallest unit of time in morse code
    Dit,
    /// Three times the length of a dit
    Dah,
}

pub const LETTERS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
pub const NUMBERS: &str = "0123456789";
pub const SYMBOLS: &str = ".,:;?/=+-()@'\"!_";

pub const PRESETS: &[&str] = &["beginner", "basic", "letters", "numbers", "symbols"];

/// Character sets offered as one-click selections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// ETANIM
    Beginner,
    /// ETANIMSORUH
    Basic,
    Letters,
    Numbers,
    Symbols,
}

impl Preset {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "beginner" => Self::Beginner,
            "basic" => Self::Basic,
            "letters" => Self::Letters,
            "numbers" => Self::Numbers,
            "symbols" => Self::Symbols,
            _ => return None,
        })
    }

    pub fn characters(&self) -> &'static str {
        match self {
            Self::Beginner => "ETANIM",
            Self::Basic => "ETANIMSORUH",
            Self::Letters => LETTERS,
            Self::Numbers => NUMBERS,
            Self::Symbols => SYMBOLS,
        }
    }

    pub fn selection(&self) -> Vec<char> {
        selection(self.characters())
    }
}

/// Gets the code for a character.
/// The table only holds upper case letters, so `a` has no code.
pub fn lookup(chr: char) -> Option<&'static [Symbol]> {
    MORSE_ENCODING
        .iter()
        .find(|(c, _)| *c == chr)
        .map(|(_, code)| *code)
}

pub fn is_supported(chr: char) -> bool {
    lookup(chr).is_some()
}

/// Renders the code of a character as dots and dashes, `A` => `.-`.
pub fn code_string(chr: char) -> Option<String> {
    let code = lookup(chr)?;
    Some(
        code.iter()
            .map(|x| match x {
                Symbol::Dit => '.',
                Symbol::Dah => '-',
            })
            .collect(),
    )
}

/// Every character in the table, in table order.
pub fn characters() -> impl Iterator<Item = char> {
    MORSE_ENCODING.iter().map(|(c, _)| *c)
}

/// Turns user text into an ordered list of unique, playable characters.
/// Input is upper cased; whitespace and characters without a code are dropped.
pub fn selection(text: &str) -> Vec<char> {
    text.chars()
        .flat_map(char::to_uppercase)
        .filter(|c| is_supported(*c))
        .collect::<IndexSet<_>>()
        .into_iter()
        .collect()
}

use Symbol::*;
const MORSE_ENCODING: [(char, &[Symbol]); 54] = [
    ('A', &[Dit, Dah]),
    ('B', &[Dah, Dit, Dit, Dit]),
    ('C', &[Dah, Dit, Dah, Dit]),
    ('D', &[Dah, Dit, Dit]),
    ('E', &[Dit]),
    ('F', &[Dit, Dit, Dah, Dit]),
    ('G', &[Dah, Dah, Dit]),
    ('H', &[Dit, Dit, Dit, Dit]),
    ('I', &[Dit, Dit]),
    ('J', &[Dit, Dah, Dah, Dah]),
    ('K', &[Dah, Dit, Dah]),
    ('L', &[Dit, Dah, Dit, Dit]),
    ('M', &[Dah, Dah]),
    ('N', &[Dah, Dit]),
    ('O', &[Dah, Dah, Dah]),
    ('P', &[Dit, Dah, Dah, Dit]),
    ('Q', &[Dah, Dah, Dit, Dah]),
    ('R', &[Dit, Dah, Dit]),
    ('S', &[Dit, Dit, Dit]),
    ('T', &[Dah]),
    ('U', &[Dit, Dit, Dah]),
    ('V', &[Dit, Dit, Dit, Dah]),
    ('W', &[Dit, Dah, Dah]),
    ('X', &[Dah, Dit, Dit, Dah]),
    ('Y', &[Dah, Dit, Dah, Dah]),
    ('Z', &[Dah, Dah, Dit, Dit]),
    ('0', &[Dah, Dah, Dah, Dah, Dah]),
    ('1', &[Dit, Dah, Dah, Dah, Dah]),
    ('2', &[Dit, Dit, Dah, Dah, Dah]),
    ('3', &[Dit, Dit, Dit, Dah, Dah]),
    ('4', &[Dit, Dit, Dit, Dit, Dah]),
    ('5', &[Dit, Dit, Dit, Dit, Dit]),
    ('6', &[Dah, Dit, Dit, Dit, Dit]),
    ('7', &[Dah, Dah, Dit, Dit, Dit]),
    ('8', &[Dah, Dah, Dah, Dit, Dit]),
    ('9', &[Dah, Dah, Dah, Dah, Dit]),
    ('.', &[Dit, Dah, Dit, Dah, Dit, Dah]),
    (',', &[Dah, Dah, Dit, Dit, Dah, Dah]),
    ('?', &[Dit, Dit, Dah, Dah, Dit, Dit]),
    ('\'', &[Dit, Dah, Dah, Dah, Dah, Dit]),
    ('!', &[Dah, Dit, Dah, Dit, Dah, Dah]),
    ('/', &[Dah, Dit, Dit, Dah, Dit]),
    ('(', &[Dah, Dit, Dah, Dah, Dit]),
    (')', &[Dah, Dit, Dah, Dah, Dit, Dah]),
    ('&', &[Dit, Dah, Dit, Dit, Dit]),
    (':', &[Dah, Dah, Dah, Dit, Dit, Dit]),
    (';', &[Dah, Dit, Dah, Dit, Dah, Dit]),
    ('=', &[Dah, Dit, Dit, Dit, Dah]),
    ('+', &[Dit, Dah, Dit, Dah, Dit]),
    ('-', &[Dah, Dit, Dit, Dit, Dit, Dah]),
    ('_', &[Dit, Dit, Dah, Dah, Dit, Dah]),
    ('"', &[Dit, Dah, Dit, Dit, Dah, Dit]),
    ('$', &[Dit, Dit, Dit, Dah, Dit, Dit, Dah]),
    ('@', &[Dit, Dah, Dah, Dit, Dah, Dit]),
];
