//! Command parsing: tokenizer, verb vocabulary and the fixed grammar.
//!
//! Grammar shapes:
//! - zero-target: `look`, `inventory`, `score`, `save`, `restore`, bare directions
//! - single-target: `take X`, `drop X`, `examine X`, `open X`, `close X`, `read X`
//! - two-target: `put X in Y`, `take X from Y`, `attack X with Y` (second part optional)
//!
//! Parsing never looks at world state. Target phrases come back normalized
//! (lowercase, articles dropped) and are resolved later.

use thiserror::Error;

use crate::game::types::Direction;

/// Words dropped from target phrases.
const ARTICLES: &[&str] = &["the", "a", "an"];

const PUT_PREPOSITIONS: &[&str] = &["in", "into", "inside", "on", "onto"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Look,
    Examine(String),
    Take(String),
    TakeFrom { item: String, container: String },
    Drop(String),
    Put { item: String, container: String },
    Open(String),
    Close(String),
    Read(String),
    Inventory,
    Go(Direction),
    Score,
    Save,
    Restore,
    Attack { target: String, weapon: Option<String> },
    /// Verb phrase outside the grammar, matched against item interactions.
    Interact(String),
}

impl Command {
    /// Canonical verb name, for logs and messages.
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Look => "look",
            Command::Examine(_) => "examine",
            Command::Take(_) | Command::TakeFrom { .. } => "take",
            Command::Drop(_) => "drop",
            Command::Put { .. } => "put",
            Command::Open(_) => "open",
            Command::Close(_) => "close",
            Command::Read(_) => "read",
            Command::Inventory => "inventory",
            Command::Go(_) => "go",
            Command::Score => "score",
            Command::Save => "save",
            Command::Restore => "restore",
            Command::Attack { .. } => "attack",
            Command::Interact(_) => "interact",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("I beg your pardon?")]
    Empty,

    /// First word is not in the vocabulary. `phrase` is the whole input,
    /// normalized, so the caller can still try item interactions.
    #[error("Unknown command: '{phrase}'")]
    UnknownVerb { verb: String, phrase: String },

    #[error("What do you want to {verb}?")]
    MissingTarget { verb: String },

    #[error("{} it where?", capitalize(.verb))]
    MissingSecondTarget { verb: String },

    #[error("Which way do you want to go?")]
    MissingDirection,

    #[error("'{0}' is not a direction you can go.")]
    UnknownDirection(String),
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Split input into lowercase words, dropping punctuation.
///
/// Underscores survive so ids typed verbatim (`trophy_case`) stay intact.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in input.chars() {
        match ch {
            c if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(current.to_lowercase());
                    current.clear();
                }
            }
            '.' | ',' | '!' | '?' | ';' | ':' | '\'' | '"' => {}
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        tokens.push(current.to_lowercase());
    }
    tokens
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Look,
    Examine,
    Take,
    Drop,
    Put,
    Open,
    Close,
    Read,
    Inventory,
    Go,
    Move,
    Score,
    Save,
    Restore,
    Attack,
}

impl Verb {
    fn from_word(word: &str) -> Option<Self> {
        let verb = match word {
            "look" | "l" => Verb::Look,
            "examine" | "x" | "inspect" | "study" | "check" => Verb::Examine,
            "take" | "get" | "grab" | "carry" => Verb::Take,
            "drop" | "discard" => Verb::Drop,
            "put" | "place" | "insert" | "stash" => Verb::Put,
            "open" | "unlock" => Verb::Open,
            "close" | "shut" | "lock" => Verb::Close,
            "read" | "peruse" => Verb::Read,
            "inventory" | "i" | "inv" => Verb::Inventory,
            "go" | "walk" | "run" | "travel" | "head" => Verb::Go,
            "move" => Verb::Move,
            "score" => Verb::Score,
            "save" => Verb::Save,
            "restore" => Verb::Restore,
            "attack" | "kill" | "fight" | "hit" | "strike" => Verb::Attack,
            _ => return None,
        };
        Some(verb)
    }
}

/// Join words into a target phrase, dropping articles.
fn phrase(words: &[String]) -> String {
    words
        .iter()
        .filter(|w| !ARTICLES.contains(&w.as_str()))
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

fn required(words: &[String], verb: &str) -> Result<String, ParseError> {
    let target = phrase(words);
    if target.is_empty() {
        Err(ParseError::MissingTarget {
            verb: verb.to_string(),
        })
    } else {
        Ok(target)
    }
}

/// Split `words` at the first preposition matching one of `preps`
/// (single words) or the two-word `out of`.
fn split_at_preposition<'a>(
    words: &'a [String],
    preps: &[&str],
) -> Option<(&'a [String], &'a [String])> {
    for (i, word) in words.iter().enumerate() {
        if preps.contains(&word.as_str()) {
            return Some((&words[..i], &words[i + 1..]));
        }
        if preps.contains(&"out of") && word == "out" && words.get(i + 1).map(String::as_str) == Some("of") {
            return Some((&words[..i], &words[i + 2..]));
        }
    }
    None
}

/// Parse one line of player input.
pub fn parse(input: &str) -> Result<Command, ParseError> {
    let tokens = tokenize(input);
    let Some(first) = tokens.first() else {
        return Err(ParseError::Empty);
    };
    let rest = &tokens[1..];

    if rest.is_empty() {
        if let Some(direction) = Direction::parse(first) {
            return Ok(Command::Go(direction));
        }
    }

    // "pick up X" is the one two-word verb.
    if first == "pick" {
        if rest.first().map(String::as_str) == Some("up") {
            return parse_take(&rest[1..]);
        }
        return Err(unknown(&tokens));
    }

    let Some(verb) = Verb::from_word(first) else {
        return Err(unknown(&tokens));
    };

    match verb {
        Verb::Look => parse_look(rest),
        Verb::Examine => Ok(Command::Examine(required(rest, "examine")?)),
        Verb::Take => parse_take(rest),
        Verb::Drop => Ok(Command::Drop(required(rest, "drop")?)),
        Verb::Put => parse_put(rest),
        Verb::Open => Ok(Command::Open(required(rest, first)?)),
        Verb::Close => Ok(Command::Close(required(rest, first)?)),
        Verb::Read => Ok(Command::Read(required(rest, "read")?)),
        Verb::Inventory => Ok(Command::Inventory),
        Verb::Go => parse_go(rest),
        Verb::Move => match rest {
            [] => Err(ParseError::MissingDirection),
            [word] if Direction::parse(word).is_some() => parse_go(rest),
            _ => Ok(Command::Interact(phrase(&tokens))),
        },
        Verb::Score => Ok(Command::Score),
        Verb::Save => Ok(Command::Save),
        Verb::Restore => Ok(Command::Restore),
        Verb::Attack => parse_attack(rest),
    }
}

fn unknown(tokens: &[String]) -> ParseError {
    ParseError::UnknownVerb {
        verb: tokens.first().cloned().unwrap_or_default(),
        phrase: phrase(tokens),
    }
}

fn parse_look(rest: &[String]) -> Result<Command, ParseError> {
    match rest.first().map(String::as_str) {
        None => Ok(Command::Look),
        Some("around") if rest.len() == 1 => Ok(Command::Look),
        Some(prep @ ("at" | "in" | "inside" | "into")) => {
            let verb = format!("look {}", prep);
            Ok(Command::Examine(required(&rest[1..], &verb)?))
        }
        Some(_) => Ok(Command::Examine(required(rest, "look at")?)),
    }
}

fn parse_take(rest: &[String]) -> Result<Command, ParseError> {
    match split_at_preposition(rest, &["from", "out of"]) {
        Some((item, container)) => {
            let item = required(item, "take")?;
            let container = phrase(container);
            if container.is_empty() {
                return Err(ParseError::MissingSecondTarget {
                    verb: "take".to_string(),
                });
            }
            Ok(Command::TakeFrom { item, container })
        }
        None => Ok(Command::Take(required(rest, "take")?)),
    }
}

fn parse_put(rest: &[String]) -> Result<Command, ParseError> {
    let Some((item, container)) = split_at_preposition(rest, PUT_PREPOSITIONS) else {
        // "put" alone asks what; "put coin" asks where.
        required(rest, "put")?;
        return Err(ParseError::MissingSecondTarget {
            verb: "put".to_string(),
        });
    };
    let item = required(item, "put")?;
    let container = phrase(container);
    if container.is_empty() {
        return Err(ParseError::MissingSecondTarget {
            verb: "put".to_string(),
        });
    }
    Ok(Command::Put { item, container })
}

fn parse_go(rest: &[String]) -> Result<Command, ParseError> {
    let words: Vec<&String> = rest
        .iter()
        .filter(|w| w.as_str() != "to" && !ARTICLES.contains(&w.as_str()))
        .collect();
    match words.as_slice() {
        [] => Err(ParseError::MissingDirection),
        [word] => Direction::parse(word)
            .map(Command::Go)
            .ok_or_else(|| ParseError::UnknownDirection(word.to_string())),
        _ => Err(ParseError::UnknownDirection(
            words.iter().map(|w| w.as_str()).collect::<Vec<_>>().join(" "),
        )),
    }
}

fn parse_attack(rest: &[String]) -> Result<Command, ParseError> {
    match split_at_preposition(rest, &["with", "using"]) {
        Some((target, weapon)) => {
            let target = required(target, "attack")?;
            let weapon = phrase(weapon);
            Ok(Command::Attack {
                target,
                weapon: if weapon.is_empty() { None } else { Some(weapon) },
            })
        }
        None => Ok(Command::Attack {
            target: required(rest, "attack")?,
            weapon: None,
        }),
    }
}
