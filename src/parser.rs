use crate::ast::{Ast, Command, RedirectMode};
use crate::tokenizer::tokenize;
use crate::word::Word;
use log::{debug, trace};

/// Recognise a redirection marker. Quoted or escaped words never are one.
pub fn redirect_mode(word: &Word) -> Option<RedirectMode> {
    if word.is_quoted() {
        return None;
    }
    match word.as_str() {
        ">" | "1>" => Some(RedirectMode::Truncate),
        ">>" | "1>>" => Some(RedirectMode::Append),
        _ => None,
    }
}

pub fn parse(line: &str) -> Ast {
    let ast = build(line);
    trace!("parsed {:?} as {:?}", line, ast);
    ast
}

fn build(line: &str) -> Ast {
    let words = match tokenize(line) {
        Ok(words) => words,
        Err(failure) => {
            debug!("tokenize failed: {}", failure);
            return Ast::invalid(line);
        }
    };

    let mut words = words.into_iter();
    let Some(name) = words.next() else {
        return Ast::Empty;
    };
    if redirect_mode(&name).is_some() {
        debug!("redirection marker in command position");
        return Ast::invalid(line);
    }
    let mut args: Vec<Word> = words.collect();

    let marker = args
        .iter()
        .enumerate()
        .find_map(|(at, word)| redirect_mode(word).map(|mode| (at, mode)));

    let Some((at, mode)) = marker else {
        return Command::new(name, args).map_or_else(|| Ast::invalid(line), Ast::Command);
    };

    // exactly one word must follow the marker
    if at + 2 != args.len() {
        debug!("redirection must be followed by exactly one target");
        return Ast::invalid(line);
    }
    let target = args.remove(at + 1);
    args.truncate(at);
    if target.is_empty() || redirect_mode(&target).is_some() {
        return Ast::invalid(line);
    }

    match Command::new(name, args) {
        Some(command) => Ast::Redirect {
            command,
            target,
            mode,
        },
        None => Ast::invalid(line),
    }
}
