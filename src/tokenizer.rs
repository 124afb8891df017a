use crate::types::ParseFailure;
use crate::word::Word;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Start,                           // skipping whitespace between words
    Arg,                             // unquoted run
    InsideSingleQuote,               // '...'
    InsideDoubleQuote,               // "..."
    JustAfterBackslash,              // \ outside quotes
    JustAfterBackslashInDoubleQuote, // \ inside "..."
    JustLeftQuote,                   // closing quote consumed
    Done,
    Failed,
}

impl State {
    pub fn is_terminal(self) -> bool {
        matches!(self, State::Done | State::Failed)
    }
}

fn is_special(c: char) -> bool {
    c.is_ascii_whitespace() || matches!(c, '\'' | '"' | '\\')
}

/// Splits one input line into words.
///
/// Each state has its own step function taking the unscanned suffix and
/// returning the next state together with what is left to scan. The word
/// under construction is `current`; `None` means no word has been started,
/// which is how an empty quoted word (`''`) differs from no word at all.
/// An empty word is only kept when whitespace ends it; at end of input it is
/// dropped.
#[derive(Debug)]
pub struct Tokenizer<'a> {
    state: State,
    rest: &'a str,
    current: Option<Word>,
    words: Vec<Word>,
    failure: Option<ParseFailure>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(line: &'a str) -> Self {
        Self::resume(State::Start, line)
    }

    /// Start the machine in an arbitrary state, as if `rest` were the
    /// remainder of a line that led there.
    pub fn resume(state: State, rest: &'a str) -> Self {
        let current = match state {
            State::Start | State::Arg | State::Done | State::Failed => None,
            _ => Some(Word::new()),
        };
        Self {
            state,
            rest,
            current,
            words: Vec::new(),
            failure: None,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn rest(&self) -> &'a str {
        self.rest
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_ref().map(Word::as_str)
    }

    /// Perform a single transition. Terminal states are left unchanged.
    pub fn step(&mut self) {
        let rest = self.rest;
        let (state, rest) = match self.state {
            State::Start => self.start_step(rest),
            State::Arg => self.arg_step(rest),
            State::InsideSingleQuote => self.single_quote_step(rest),
            State::InsideDoubleQuote => self.double_quote_step(rest),
            State::JustAfterBackslash => self.backslash_step(rest),
            State::JustAfterBackslashInDoubleQuote => self.double_quote_backslash_step(rest),
            State::JustLeftQuote => self.left_quote_step(rest),
            State::Done | State::Failed => (self.state, rest),
        };
        self.state = state;
        self.rest = rest;
    }

    pub fn run(mut self) -> Result<Vec<Word>, ParseFailure> {
        while !self.state.is_terminal() {
            self.step();
        }
        match self.failure {
            Some(failure) => Err(failure),
            None => Ok(self.words),
        }
    }

    fn word(&mut self) -> &mut Word {
        self.current.get_or_insert_with(Word::new)
    }

    fn emit(&mut self) {
        if let Some(word) = self.current.take() {
            self.words.push(word);
        }
    }

    fn emit_final(&mut self) {
        if let Some(word) = self.current.take().filter(|word| !word.is_empty()) {
            self.words.push(word);
        }
    }

    fn fail(&mut self, failure: ParseFailure, rest: &'a str) -> (State, &'a str) {
        self.failure = Some(failure);
        (State::Failed, rest)
    }

    fn start_step(&mut self, rest: &'a str) -> (State, &'a str) {
        let rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        if rest.is_empty() {
            (State::Done, rest)
        } else {
            (State::Arg, rest)
        }
    }

    fn arg_step(&mut self, rest: &'a str) -> (State, &'a str) {
        let end = rest.find(is_special).unwrap_or(rest.len());
        if end > 0 {
            self.word().push_str(&rest[..end]);
        }
        let rest = &rest[end..];
        let Some(stop) = rest.chars().next() else {
            self.emit_final();
            return (State::Done, rest);
        };
        let after = &rest[stop.len_utf8()..];
        match stop {
            '\'' => {
                self.word().mark_quoted();
                (State::InsideSingleQuote, after)
            }
            '"' => {
                self.word().mark_quoted();
                (State::InsideDoubleQuote, after)
            }
            '\\' => {
                self.word().mark_quoted();
                (State::JustAfterBackslash, after)
            }
            _ => {
                self.emit();
                (State::Start, rest)
            }
        }
    }

    fn single_quote_step(&mut self, rest: &'a str) -> (State, &'a str) {
        match rest.find('\'') {
            Some(end) => {
                self.word().push_str(&rest[..end]);
                (State::JustLeftQuote, &rest[end + 1..])
            }
            None => self.fail(ParseFailure::UnterminatedQuote, rest),
        }
    }

    fn double_quote_step(&mut self, rest: &'a str) -> (State, &'a str) {
        let Some(end) = rest.find(['"', '\\']) else {
            return self.fail(ParseFailure::UnterminatedQuote, rest);
        };
        self.word().push_str(&rest[..end]);
        let after = &rest[end + 1..];
        if rest[end..].starts_with('"') {
            (State::JustLeftQuote, after)
        } else {
            (State::JustAfterBackslashInDoubleQuote, after)
        }
    }

    fn backslash_step(&mut self, rest: &'a str) -> (State, &'a str) {
        let mut chars = rest.chars();
        match chars.next() {
            Some(c) => {
                self.word().push(c);
                (State::Arg, chars.as_str())
            }
            None => self.fail(ParseFailure::TrailingBackslash, rest),
        }
    }

    fn double_quote_backslash_step(&mut self, rest: &'a str) -> (State, &'a str) {
        let mut chars = rest.chars();
        let Some(c) = chars.next() else {
            return self.fail(ParseFailure::UnterminatedQuote, rest);
        };
        let word = self.word();
        if !matches!(c, '"' | '\\') {
            word.push('\\');
        }
        word.push(c);
        (State::InsideDoubleQuote, chars.as_str())
    }

    fn left_quote_step(&mut self, rest: &'a str) -> (State, &'a str) {
        match rest.chars().next() {
            None => {
                self.emit_final();
                (State::Done, rest)
            }
            Some(c) if c.is_ascii_whitespace() => {
                self.emit();
                (State::Start, rest)
            }
            Some(_) => (State::Arg, rest),
        }
    }
}

pub fn tokenize(line: &str) -> Result<Vec<Word>, ParseFailure> {
    Tokenizer::new(line).run()
}
