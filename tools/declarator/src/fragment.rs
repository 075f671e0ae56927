//! Token sequences produced by declarator synthesis.

use std::collections::VecDeque;
use std::fmt;

/// An ordered sequence of C++ tokens, built from the inside out.
///
/// Synthesis works on tokens rather than text so that spacing is decided once, by [render],
/// and tests can compare token for token.
///
/// [render]: Fragment::render
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Fragment {
    tokens: VecDeque<String>,
}

impl Fragment {
    pub fn new() -> Fragment {
        Fragment::default()
    }

    /// A fragment holding just `name`, or nothing if `name` is empty.
    pub fn name(name: &str) -> Fragment {
        let mut fragment = Fragment::new();
        if !name.is_empty() {
            fragment.append(name);
        }
        fragment
    }

    pub fn prepend(&mut self, token: impl Into<String>) {
        self.tokens.push_front(token.into());
    }

    pub fn append(&mut self, token: impl Into<String>) {
        self.tokens.push_back(token.into());
    }

    /// Places `other` in front of this fragment.
    pub fn prepend_all(&mut self, other: Fragment) {
        for token in other.tokens.into_iter().rev() {
            self.tokens.push_front(token);
        }
    }

    pub fn append_all(&mut self, other: Fragment) {
        self.tokens.extend(other.tokens);
    }

    /// Wraps the whole fragment in `(` `)`.
    pub fn parenthesize(&mut self) {
        self.prepend("(");
        self.append(")");
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// Joins the tokens into source text.
    pub fn render(&self) -> String {
        let tokens: Vec<&str> = self.tokens().collect();
        let mut out = String::new();
        for (i, token) in tokens.iter().enumerate() {
            if i > 0 && needs_space(&tokens, i) {
                out.push(' ');
            }
            out.push_str(token);
        }
        out
    }
}

fn needs_space(tokens: &[&str], i: usize) -> bool {
    let (prev, cur) = (tokens[i - 1], tokens[i]);
    if matches!(prev, "(" | "[" | "::" | "<" | "*" | "&" | "&&") {
        return false;
    }
    match cur {
        ")" | "]" | "," | "[" | "::" | ";" | "<" | ">" => false,
        "..." => prev == ",",
        "(" => prev != ")" && opens_group(tokens, i),
        _ => true,
    }
}

/// True if the `(` at `i` groups a pointer declarator, as in `int (*f)(int)` or
/// `int (A::*m)`, rather than opening a parameter list.
fn opens_group(tokens: &[&str], i: usize) -> bool {
    let mut j = i + 1;
    while tokens.get(j + 1) == Some(&"::") {
        j += 2;
    }
    matches!(tokens.get(j), Some(&("*" | "&" | "&&")))
}

impl fmt::Display for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl<S: Into<String>> FromIterator<S> for Fragment {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Fragment {
            tokens: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<const N: usize> PartialEq<[&str; N]> for Fragment {
    fn eq(&self, other: &[&str; N]) -> bool {
        self.tokens().eq(other.iter().copied())
    }
}

impl PartialEq<&[&str]> for Fragment {
    fn eq(&self, other: &&[&str]) -> bool {
        self.tokens().eq(other.iter().copied())
    }
}
