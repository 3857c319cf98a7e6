//! Utilities to help with building problems
use std::borrow::Cow;
use std::collections::HashSet;

/// Useful to generate a list of unique valid variable names
#[derive(Debug, Default)]
pub struct UniqueNameGenerator {
    names: HashSet<String>,
}

impl UniqueNameGenerator {
    /// Create a new variable. Returns a valid variable name, never returned before by this generator.
    ///
    /// ```
    /// use lp_frames::util::UniqueNameGenerator;
    ///
    /// let mut gen = UniqueNameGenerator::default();
    /// assert_eq!(gen.add_variable("x"), "x");
    /// assert_eq!(gen.add_variable("y"), "y");
    /// assert_eq!(gen.add_variable("x[0]"), "x_0_");
    /// assert_eq!(gen.add_variable("x[a,1]"), "x_a_1_");
    /// assert_eq!(gen.add_variable("2x"), "_2x"); // names cannot start with a digit
    /// assert_eq!(gen.add_variable(""), "v");
    /// assert_eq!(gen.add_variable("x"), "x2"); // A variable with name x is already present
    /// assert_eq!(gen.add_variable("x(0)"), "x_0_2"); // and so is x_0_
    /// ```
    pub fn add_variable<'a>(&mut self, name: &'a str) -> Cow<'a, str> {
        let stem = stem(name);
        if self.names.insert(stem.to_string()) {
            return stem;
        }
        let mut n = 1;
        loop {
            n += 1;
            let candidate = format!("{}{}", stem, n);
            if self.names.insert(candidate.clone()) {
                return Cow::Owned(candidate);
            }
        }
    }
}

fn is_valid(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn stem(name: &str) -> Cow<str> {
    let starts_with_digit = name.starts_with(|c: char| c.is_ascii_digit());
    if name.contains(|c: char| !is_valid(c)) || name.is_empty() || starts_with_digit {
        let mut owned: String = name
            .chars()
            .map(|c| if is_valid(c) { c } else { '_' })
            .collect();
        if owned.is_empty() {
            owned.push('v');
        } else if starts_with_digit {
            owned.insert(0, '_');
        }
        Cow::Owned(owned)
    } else {
        Cow::Borrowed(name)
    }
}

/// Whether the bytes written by a solver contain the given text
pub fn buf_contains(haystack: &[u8], needle: &str) -> bool {
    let needle = needle.as_bytes();
    haystack
        .windows(needle.len())
        .any(|window| window == needle)
}
