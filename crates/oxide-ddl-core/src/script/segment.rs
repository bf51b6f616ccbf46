//! Directive/body segmentation of a script.

use regex::Regex;

use super::DEFAULT_TERMINATOR;

/// One piece of a script as seen by the splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// A `SET TERM <new> <current>` directive. Never executed.
    Directive {
        /// The terminator in effect after the directive.
        terminator: &'a str,
    },
    /// Text between directives.
    Body {
        /// Raw, untrimmed body text.
        text: &'a str,
        /// The terminator in effect for this body.
        terminator: &'a str,
    },
}

/// Builds the directive pattern for the terminator currently in effect.
///
/// The directive closes with the *current* terminator, so `SET TERM $$ ;`
/// matches under `;` and `SET TERM ; $$` matches under `$$`.
fn directive_pattern(terminator: &str) -> Option<Regex> {
    Regex::new(&format!(
        r"(?i)\bSET\s+TERM\s+(\S+?)\s*{}",
        regex::escape(terminator)
    ))
    .ok()
}

/// Iterator over the directive and body segments of a script.
///
/// The terminator is threaded through the iteration: each body carries the
/// value set by the directive immediately before it, or
/// [`DEFAULT_TERMINATOR`] when none has been seen yet.
#[derive(Debug)]
pub struct Segments<'a> {
    rest: &'a str,
    terminator: &'a str,
    pattern: Option<Regex>,
}

impl<'a> Segments<'a> {
    /// Starts segmenting `script` under the default terminator.
    #[must_use]
    pub fn new(script: &'a str) -> Self {
        Self {
            rest: script,
            terminator: DEFAULT_TERMINATOR,
            pattern: directive_pattern(DEFAULT_TERMINATOR),
        }
    }

    /// Returns the terminator in effect at the current position.
    #[must_use]
    pub const fn terminator(&self) -> &'a str {
        self.terminator
    }

    fn take_body(&mut self, end: usize) -> Segment<'a> {
        let text = &self.rest[..end];
        self.rest = &self.rest[end..];
        Segment::Body {
            text,
            terminator: self.terminator,
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let rest = self.rest;
        let found = self
            .pattern
            .as_ref()
            .and_then(|pattern| pattern.captures(rest))
            .and_then(|caps| Some((caps.get(0)?, caps.get(1)?)));

        match found {
            None => Some(self.take_body(rest.len())),
            Some((whole, _)) if whole.start() > 0 => Some(self.take_body(whole.start())),
            Some((whole, new_terminator)) => {
                self.rest = &rest[whole.end()..];
                self.terminator = new_terminator.as_str();
                self.pattern = directive_pattern(self.terminator);
                Some(Segment::Directive {
                    terminator: self.terminator,
                })
            }
        }
    }
}
