//! Structural selectors for the outliner filter box.
//!
//! Supports a practical subset of CSS: selector lists (`a, b`), type (`mesh`,
//! `*`), `#id`, `.class`, `[attr]`, `[attr=value]` and `[attr="quoted"]`,
//! plus descendant (whitespace) and child (`>`) combinators.

use thiserror::Error;

use crate::host::SceneHost;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    #[error("selector is empty")]
    Empty,
    #[error("unexpected {found:?} at offset {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("expected a name at offset {0}")]
    ExpectedName(usize),
    #[error("attribute selector opened at offset {0} is not closed")]
    UnterminatedAttribute(usize),
    #[error("combinator at offset {0} has nothing to its right")]
    DanglingCombinator(usize),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selector {
    alternatives: Vec<Complex>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Complex {
    compounds: Vec<Compound>,
    /// `combinators[i]` joins `compounds[i]` and `compounds[i + 1]`.
    combinators: Vec<Combinator>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct Compound(Vec<Simple>);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Simple {
    Universal,
    Type(String),
    Id(String),
    Class(String),
    Attribute { name: String, value: Option<String> },
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self, SelectorError> {
        let mut parser = Parser::new(input);
        parser.skip_whitespace();
        if parser.at_end() {
            return Err(SelectorError::Empty);
        }

        let mut alternatives = vec![parser.complex()?];
        loop {
            parser.skip_whitespace();
            match parser.peek() {
                None => break,
                Some(',') => {
                    parser.bump();
                    parser.skip_whitespace();
                    alternatives.push(parser.complex()?);
                }
                Some(found) => {
                    return Err(SelectorError::Unexpected {
                        found,
                        offset: parser.pos,
                    });
                }
            }
        }

        Ok(Self { alternatives })
    }

    pub fn matches<H: SceneHost + ?Sized>(&self, host: &H, node: H::Node) -> bool {
        self.alternatives
            .iter()
            .any(|complex| complex.matches_at(host, node, complex.compounds.len() - 1))
    }
}

impl std::str::FromStr for Selector {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Complex {
    /// Match `compounds[..=index]` with `node` standing in for `compounds[index]`.
    fn matches_at<H: SceneHost + ?Sized>(&self, host: &H, node: H::Node, index: usize) -> bool {
        if !self.compounds[index].matches(host, node) {
            return false;
        }
        if index == 0 {
            return true;
        }

        match self.combinators[index - 1] {
            Combinator::Child => host
                .parent(node)
                .is_some_and(|parent| self.matches_at(host, parent, index - 1)),
            Combinator::Descendant => {
                let mut ancestor = host.parent(node);
                while let Some(current) = ancestor {
                    if self.matches_at(host, current, index - 1) {
                        return true;
                    }
                    ancestor = host.parent(current);
                }
                false
            }
        }
    }
}

impl Compound {
    fn matches<H: SceneHost + ?Sized>(&self, host: &H, node: H::Node) -> bool {
        self.0.iter().all(|simple| match simple {
            Simple::Universal => true,
            Simple::Type(tag) => host.tag_name(node).eq_ignore_ascii_case(tag),
            Simple::Id(id) => host.identifier(node).as_deref() == Some(id.as_str()),
            Simple::Class(class) => host.class_list(node).iter().any(|c| c == class),
            Simple::Attribute { name, value } => match (host.attribute(node, name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == *expected,
                (None, _) => false,
            },
        })
    }
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) {
        self.pos += 1;
    }

    fn at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    /// Returns whether anything was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos > start
    }

    fn complex(&mut self) -> Result<Complex, SelectorError> {
        let mut compounds = vec![self.compound()?];
        let mut combinators = Vec::new();

        loop {
            let had_whitespace = self.skip_whitespace();
            let combinator = match self.peek() {
                None | Some(',') => break,
                Some('>') => {
                    self.bump();
                    self.skip_whitespace();
                    Combinator::Child
                }
                Some(_) if had_whitespace => Combinator::Descendant,
                Some(found) => {
                    return Err(SelectorError::Unexpected {
                        found,
                        offset: self.pos,
                    });
                }
            };
            if matches!(self.peek(), None | Some(',')) {
                return Err(SelectorError::DanglingCombinator(self.pos));
            }
            combinators.push(combinator);
            compounds.push(self.compound()?);
        }

        Ok(Complex {
            compounds,
            combinators,
        })
    }

    fn compound(&mut self) -> Result<Compound, SelectorError> {
        let start = self.pos;
        let mut parts = Vec::new();

        match self.peek() {
            Some('*') => {
                self.bump();
                parts.push(Simple::Universal);
            }
            Some(c) if is_name_char(c) => parts.push(Simple::Type(self.name()?)),
            _ => {}
        }

        loop {
            match self.peek() {
                Some('#') => {
                    self.bump();
                    parts.push(Simple::Id(self.name()?));
                }
                Some('.') => {
                    self.bump();
                    parts.push(Simple::Class(self.name()?));
                }
                Some('[') => parts.push(self.attribute()?),
                _ => break,
            }
        }

        if parts.is_empty() {
            return Err(match self.peek() {
                Some(found) => SelectorError::Unexpected {
                    found,
                    offset: start,
                },
                None => SelectorError::ExpectedName(start),
            });
        }
        Ok(Compound(parts))
    }

    fn name(&mut self) -> Result<String, SelectorError> {
        let start = self.pos;
        while self.peek().is_some_and(is_name_char) {
            self.bump();
        }
        if self.pos == start {
            return Err(SelectorError::ExpectedName(start));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn attribute(&mut self) -> Result<Simple, SelectorError> {
        let open = self.pos;
        self.bump();
        self.skip_whitespace();
        let name = self.name()?;
        self.skip_whitespace();

        let value = if self.peek() == Some('=') {
            self.bump();
            self.skip_whitespace();
            let value = self.value(open)?;
            self.skip_whitespace();
            Some(value)
        } else {
            None
        };

        match self.peek() {
            Some(']') => {
                self.bump();
                Ok(Simple::Attribute { name, value })
            }
            Some(found) => Err(SelectorError::Unexpected {
                found,
                offset: self.pos,
            }),
            None => Err(SelectorError::UnterminatedAttribute(open)),
        }
    }

    fn value(&mut self, open: usize) -> Result<String, SelectorError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                let start = self.pos;
                while let Some(c) = self.peek() {
                    if c == quote {
                        let value = self.chars[start..self.pos].iter().collect();
                        self.bump();
                        return Ok(value);
                    }
                    self.bump();
                }
                Err(SelectorError::UnterminatedAttribute(open))
            }
            _ => self.name(),
        }
    }
}
