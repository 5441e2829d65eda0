//! Deterministic finite automaton that classifies lexeme candidates
//!
//! The [`Lexer`](super::lexer::Lexer) groups characters into candidates; this
//! module decides what each candidate is. The automaton is a flat table of
//! states, each holding an ordered list of `(CharClass, next state)` edges and an
//! optional accepting [`TokenKind`]. A character follows the first edge whose
//! class contains it; no matching edge is the failure state.
//!
//! Keywords are exact-match paths threaded through the identifier states: every
//! state on the path to `randy` accepts as [`TokenKind::Variable`] and falls back
//! to the generic identifier state on any other letter or digit, so `ran` and
//! `randyx` are variables while `randy` is the loop keyword.
//!
//! ```text
//! start ─r→ (var) ─a→ (var) ─w→ [ProgramStart]
//!                         └─n→ (var) ─d→ (var) ─y→ [While]
//! start ─letter→ [Variable] ─letter|digit→ [Variable]
//! start ─digit→ [Number] ─.→ [Float] ─e→ ( ) ─sign→ ( ) ─digit→ [Float]
//! ```

use super::lexer::TokenKind;
use std::sync::OnceLock;

/// Index of a state in the transition table
pub type StateId = usize;

/// The initial state every candidate starts from
pub const START: StateId = 0;

/// Reserved words and the token kind their final state accepts
const KEYWORDS: &[(&str, TokenKind)] = &[
    ("raw", TokenKind::ProgramStart),
    ("smackdown", TokenKind::ProgramEnd),
    ("nxt", TokenKind::Declare),
    ("nexus", TokenKind::DeclareList),
    ("anunciar", TokenKind::Announce),
    ("promo", TokenKind::Promo),
    ("jeff", TokenKind::If),
    ("matt", TokenKind::Else),
    ("hardy", TokenKind::EndIf),
    ("randy", TokenKind::While),
    ("orton", TokenKind::EndWhile),
];

/// List accessor suffixes, spelled after the leading point
const ACCESSORS: &[(&str, TokenKind)] = &[
    ("f", TokenKind::First),
    ("first", TokenKind::First),
    ("l", TokenKind::Last),
    ("last", TokenKind::Last),
    ("s", TokenKind::Size),
    ("size", TokenKind::Size),
];

/// Character classes used on transition edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Exactly this character
    Exact(char),
    /// Any character of the set
    OneOf(&'static str),
    /// ASCII letter or underscore
    Letter,
    /// ASCII digit
    Digit,
    /// Letter, digit or underscore
    IdentTail,
    /// Inside a string: anything but a quote, a backslash or a newline
    StringBody,
    /// Anything but a newline
    AnyInLine,
}

impl CharClass {
    /// Check whether `ch` belongs to this class
    pub fn contains(self, ch: char) -> bool {
        match self {
            CharClass::Exact(c) => ch == c,
            CharClass::OneOf(set) => set.contains(ch),
            CharClass::Letter => ch.is_ascii_alphabetic() || ch == '_',
            CharClass::Digit => ch.is_ascii_digit(),
            CharClass::IdentTail => ch.is_ascii_alphanumeric() || ch == '_',
            CharClass::StringBody => !matches!(ch, '"' | '\\' | '\n'),
            CharClass::AnyInLine => ch != '\n',
        }
    }
}

#[derive(Debug, Clone, Default)]
struct State {
    edges: Vec<(CharClass, StateId)>,
    accept: Option<TokenKind>,
}

/// Transition table plus accepting map
#[derive(Debug, Clone)]
pub struct Automaton {
    states: Vec<State>,
}

impl Automaton {
    /// Build the full transition table
    pub fn new() -> Self {
        let mut dfa = Automaton {
            states: vec![State::default()],
        };

        // Identifiers
        let ident = dfa.add_state(Some(TokenKind::Variable));
        dfa.edge(ident, CharClass::IdentTail, ident);
        dfa.edge(START, CharClass::Letter, ident);

        // Numbers: integer part, fraction, exponent
        let integer = dfa.add_state(Some(TokenKind::Number));
        let fraction = dfa.add_state(Some(TokenKind::Float));
        let signed_point = dfa.add_state(None);
        let exponent = dfa.add_state(None);
        let exponent_sign = dfa.add_state(None);
        let exponent_digits = dfa.add_state(Some(TokenKind::Float));
        dfa.edge(integer, CharClass::Digit, integer);
        dfa.edge(integer, CharClass::Exact('.'), fraction);
        dfa.edge(integer, CharClass::OneOf("eE"), exponent);
        dfa.edge(fraction, CharClass::Digit, fraction);
        dfa.edge(fraction, CharClass::OneOf("eE"), exponent);
        dfa.edge(signed_point, CharClass::Digit, fraction);
        dfa.edge(exponent, CharClass::OneOf("+-"), exponent_sign);
        dfa.edge(exponent, CharClass::Digit, exponent_digits);
        dfa.edge(exponent_sign, CharClass::Digit, exponent_digits);
        dfa.edge(exponent_digits, CharClass::Digit, exponent_digits);
        dfa.edge(START, CharClass::Digit, integer);

        // Signs double as arithmetic operators and as number prefixes
        let plus = dfa.add_state(Some(TokenKind::Arithmetic));
        let minus = dfa.add_state(Some(TokenKind::Arithmetic));
        let announce_open = dfa.add_state(Some(TokenKind::AnnounceOpen));
        for sign in [plus, minus] {
            dfa.edge(sign, CharClass::Digit, integer);
            dfa.edge(sign, CharClass::Exact('.'), signed_point);
        }
        dfa.edge(minus, CharClass::Exact('>'), announce_open);
        dfa.edge(START, CharClass::Exact('+'), plus);
        dfa.edge(START, CharClass::Exact('-'), minus);

        let arithmetic = dfa.add_state(Some(TokenKind::Arithmetic));
        dfa.edge(START, CharClass::OneOf("*/%"), arithmetic);

        // Assignment, comparisons and the left arrow
        let relational = dfa.add_state(Some(TokenKind::Comparison));
        let assign = dfa.add_state(Some(TokenKind::Assign));
        let less = dfa.add_state(Some(TokenKind::Comparison));
        let greater = dfa.add_state(Some(TokenKind::Comparison));
        let arrow = dfa.add_state(Some(TokenKind::Arrow));
        dfa.edge(assign, CharClass::Exact('='), relational);
        dfa.edge(less, CharClass::Exact('-'), arrow);
        dfa.edge(less, CharClass::OneOf("=>"), relational);
        dfa.edge(greater, CharClass::Exact('='), relational);
        dfa.edge(START, CharClass::Exact('='), assign);
        dfa.edge(START, CharClass::Exact('<'), less);
        dfa.edge(START, CharClass::Exact('>'), greater);

        // Brackets
        let lbracket = dfa.add_state(Some(TokenKind::LBracket));
        let rbracket = dfa.add_state(Some(TokenKind::RBracket));
        dfa.edge(START, CharClass::Exact('['), lbracket);
        dfa.edge(START, CharClass::Exact(']'), rbracket);

        // Strings keep their quotes; a backslash escapes the next character
        let string_body = dfa.add_state(None);
        let string_escape = dfa.add_state(None);
        let string_end = dfa.add_state(Some(TokenKind::String));
        dfa.edge(string_body, CharClass::Exact('"'), string_end);
        dfa.edge(string_body, CharClass::Exact('\\'), string_escape);
        dfa.edge(string_body, CharClass::StringBody, string_body);
        dfa.edge(string_escape, CharClass::AnyInLine, string_body);
        dfa.edge(START, CharClass::Exact('"'), string_body);

        // Accessor suffixes
        let point = dfa.add_state(None);
        dfa.edge(START, CharClass::Exact('.'), point);
        for (word, kind) in ACCESSORS {
            dfa.add_word(point, word, *kind, None);
        }

        for (word, kind) in KEYWORDS {
            dfa.add_word(START, word, *kind, Some(ident));
        }

        dfa
    }

    /// Follow one character from `state`; `None` is the failure state
    pub fn next_state(&self, state: StateId, ch: char) -> Option<StateId> {
        self.states.get(state)?.edges.iter().find_map(|(class, next)| {
            if class.contains(ch) {
                Some(*next)
            } else {
                None
            }
        })
    }

    /// Token kind accepted by `state`, if it is an accepting state
    pub fn accepting(&self, state: StateId) -> Option<TokenKind> {
        self.states.get(state).and_then(|s| s.accept)
    }

    /// Run a whole candidate from the initial state and classify it
    pub fn classify(&self, lexeme: &str) -> TokenKind {
        let mut state = START;
        for ch in lexeme.chars() {
            match self.next_state(state, ch) {
                Some(next) => state = next,
                None => return TokenKind::Unrecognized,
            }
        }
        self.accepting(state).unwrap_or(TokenKind::Unrecognized)
    }

    /// Number of states in the table
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    fn add_state(&mut self, accept: Option<TokenKind>) -> StateId {
        self.states.push(State {
            edges: Vec::new(),
            accept,
        });
        self.states.len() - 1
    }

    fn edge(&mut self, from: StateId, class: CharClass, to: StateId) {
        self.states[from].edges.push((class, to));
    }

    /// Thread an exact-match path for `word` out of `from`.
    ///
    /// With `fallback` set, new states on the path accept as variables and route
    /// any other identifier character to the fallback state. Exact edges are
    /// placed ahead of the generic ones so they win.
    fn add_word(
        &mut self,
        from: StateId,
        word: &str,
        kind: TokenKind,
        fallback: Option<StateId>,
    ) {
        let mut state = from;
        for ch in word.chars() {
            let existing = self.states[state]
                .edges
                .iter()
                .find(|(class, _)| *class == CharClass::Exact(ch))
                .map(|(_, next)| *next);

            state = match existing {
                Some(next) => next,
                None => {
                    let next = match fallback {
                        Some(ident) => {
                            let next = self.add_state(Some(TokenKind::Variable));
                            self.edge(next, CharClass::IdentTail, ident);
                            next
                        }
                        None => self.add_state(None),
                    };
                    self.states[state]
                        .edges
                        .insert(0, (CharClass::Exact(ch), next));
                    next
                }
            };
        }
        self.states[state].accept = Some(kind);
    }
}

impl Default for Automaton {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared automaton, built on first use
pub fn automaton() -> &'static Automaton {
    static AUTOMATON: OnceLock<Automaton> = OnceLock::new();
    AUTOMATON.get_or_init(Automaton::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(lexeme: &str) -> TokenKind {
        automaton().classify(lexeme)
    }

    #[test]
    fn test_keywords() {
        assert_eq!(kind("raw"), TokenKind::ProgramStart);
        assert_eq!(kind("smackdown"), TokenKind::ProgramEnd);
        assert_eq!(kind("nxt"), TokenKind::Declare);
        assert_eq!(kind("nexus"), TokenKind::DeclareList);
        assert_eq!(kind("anunciar"), TokenKind::Announce);
        assert_eq!(kind("promo"), TokenKind::Promo);
        assert_eq!(kind("jeff"), TokenKind::If);
        assert_eq!(kind("matt"), TokenKind::Else);
        assert_eq!(kind("hardy"), TokenKind::EndIf);
        assert_eq!(kind("randy"), TokenKind::While);
        assert_eq!(kind("orton"), TokenKind::EndWhile);
    }

    #[test]
    fn test_keyword_prefixes_and_extensions_are_variables() {
        for lexeme in ["r", "ra", "ran", "rawr", "smack", "n", "ne", "nx", "nxt2", "hardy_", "x"] {
            assert_eq!(kind(lexeme), TokenKind::Variable, "{lexeme}");
        }
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kind("42"), TokenKind::Number);
        assert_eq!(kind("-3"), TokenKind::Number);
        assert_eq!(kind("+7"), TokenKind::Number);
        assert_eq!(kind("1.5"), TokenKind::Float);
        assert_eq!(kind("2."), TokenKind::Float);
        assert_eq!(kind("+.5"), TokenKind::Float);
        assert_eq!(kind("3.2e-4"), TokenKind::Float);
        assert_eq!(kind("1e5"), TokenKind::Float);
        assert_eq!(kind("1e"), TokenKind::Unrecognized);
        assert_eq!(kind("1.2.3"), TokenKind::Unrecognized);
        assert_eq!(kind("--1"), TokenKind::Unrecognized);
    }

    #[test]
    fn test_operators() {
        for op in ["+", "-", "*", "/", "%"] {
            assert_eq!(kind(op), TokenKind::Arithmetic, "{op}");
        }
        for op in ["<", ">", "<=", ">=", "<>", "=="] {
            assert_eq!(kind(op), TokenKind::Comparison, "{op}");
        }
        assert_eq!(kind("="), TokenKind::Assign);
        assert_eq!(kind("->"), TokenKind::AnnounceOpen);
        assert_eq!(kind("<-"), TokenKind::Arrow);
        assert_eq!(kind("=<"), TokenKind::Unrecognized);
        assert_eq!(kind("x=1"), TokenKind::Unrecognized);
    }

    #[test]
    fn test_accessors() {
        assert_eq!(kind(".first"), TokenKind::First);
        assert_eq!(kind(".f"), TokenKind::First);
        assert_eq!(kind(".last"), TokenKind::Last);
        assert_eq!(kind(".l"), TokenKind::Last);
        assert_eq!(kind(".size"), TokenKind::Size);
        assert_eq!(kind(".s"), TokenKind::Size);
        assert_eq!(kind(".si"), TokenKind::Unrecognized);
        assert_eq!(kind(".sizes"), TokenKind::Unrecognized);
        assert_eq!(kind("."), TokenKind::Unrecognized);
    }

    #[test]
    fn test_strings() {
        assert_eq!(kind("\"hello world\""), TokenKind::String);
        assert_eq!(kind("\"a \\\" quote\""), TokenKind::String);
        assert_eq!(kind("\"unterminated"), TokenKind::Unrecognized);
        assert_eq!(kind("\"done\"x"), TokenKind::Unrecognized);
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(kind("["), TokenKind::LBracket);
        assert_eq!(kind("]"), TokenKind::RBracket);
        assert_eq!(kind("("), TokenKind::Unrecognized);
    }

    #[test]
    fn test_failure_state() {
        let dfa = automaton();
        assert_eq!(dfa.next_state(START, '@'), None);
        let r = dfa.next_state(START, 'r').unwrap();
        assert_eq!(dfa.accepting(r), Some(TokenKind::Variable));
        assert!(!dfa.is_empty());
    }
}
