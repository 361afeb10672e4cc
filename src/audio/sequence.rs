//! Playback plans.
//! Text is turned into a list of tones and silences with exact durations,
//! which a [`super::player::Player`] then realises.

use crate::coding::morse;

use super::timing::TimingProfile;

/// One step of a plan. Durations are in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Element {
    Tone(f64),
    Gap(f64),
}

impl Element {
    pub fn duration(&self) -> f64 {
        match self {
            Self::Tone(x) | Self::Gap(x) => *x,
        }
    }
}

/// A sequence of tones and gaps, played in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sequence {
    elements: Vec<Element>,
}

impl Sequence {
    /// Create a new empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element to the sequence.
    pub fn chain(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    /// Plan for a single character: its elements separated by element gaps, then a character gap.
    /// Characters without a code produce an empty plan.
    pub fn character(chr: char, timing: &TimingProfile) -> Self {
        let mut out = Self::new();
        out.add_character(chr, timing);
        out
    }

    /// Plan for a phrase. Case insensitive.
    /// A space only adds the difference between the word and character gaps,
    /// since the previous character already ended with a character gap.
    pub fn text(text: &str, timing: &TimingProfile) -> Self {
        let mut out = Self::new();
        for c in text.to_uppercase().chars() {
            match c {
                ' ' => out.elements.push(Element::Gap(timing.word_space())),
                _ => out.add_character(c, timing),
            }
        }

        out
    }

    fn add_character(&mut self, chr: char, timing: &TimingProfile) {
        let Some(code) = morse::lookup(chr) else {
            return;
        };

        for (i, &symbol) in code.iter().enumerate() {
            self.elements.push(Element::Tone(timing.symbol(symbol)));
            if i + 1 < code.len() {
                self.elements.push(Element::Gap(timing.element_gap));
            }
        }

        self.elements.push(Element::Gap(timing.char_gap));
    }

    /// Total length of the plan in seconds.
    pub fn duration(&self) -> f64 {
        self.elements.iter().map(Element::duration).sum()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
