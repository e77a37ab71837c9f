//! Splitting WNDB glosses into a definition and examples.
//!
//! Glosses are loosely formatted: examples usually follow the definition
//! after `;`, `:` or `,` and are quoted, but definitions may contain quotes,
//! parentheticals and `e.g.` markers, and examples may miss a closing quote
//! or run into each other. The grammar below is a PEG; every rule is a
//! method of [`GlossParser`] and alternatives are tried in the order given.
//!
//! ```text
//! Start       <- SPACE* Gloss EOS
//! Gloss       <- Definition DELIM Examples
//!              / Definition Examples
//!              / "" Examples
//! Definition  <- !'"' ( (!DELIM DefContent)+ '"'? ) SPACE*
//! DefContent  <- [Ee] '.'? [Gg] '.'? DELIM?
//!              / '(' (!')' .)* ')'
//!              / &('"' ALNUM) Quote
//!              / ALNUM '"' &((SPACE+ / DELIM / EOS) !'"')
//!              / !'"' .
//! Examples    <- Example ((EXDELIM / SPACE* &'"') Example)*
//!              / ''
//! Example     <- Quote (NonQuote Quote?)* ('"' &(DELIM / SPACE* EOS))?
//!              / '"' .*
//! Quote       <- '"' '"'? InQuote* '"' ('"' !ALNUM)?
//! InQuote     <- !'"' .
//!              / '"' ALNUM
//! NonQuote    <- SPACE* (!(EXDELIM / '"') .)+ ','? SPACE*
//! DELIM       <- [;:,] SPACE* &'"'
//! EXDELIM     <- SPACE* ([;:,] / 'or') SPACE* &'"'
//! ```

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Gloss {
    pub definition: String,
    /// Examples keep their quotation marks.
    pub examples: Vec<String>,
}

/// Parses a gloss, or returns `None` if the grammar does not cover it.
pub fn parse_gloss(gloss: &str) -> Option<Gloss> {
    let parser = GlossParser::new(gloss);
    let (definition, examples) = parser.parse()?;
    Some(Gloss {
        definition: parser.slice(definition),
        examples: examples.into_iter().map(|r| parser.slice(r)).collect(),
    })
}

/// Like [`parse_gloss`], but a gloss the grammar does not cover becomes the
/// definition as a whole.
pub fn split_gloss(gloss: &str) -> Gloss {
    parse_gloss(gloss).unwrap_or_else(|| Gloss {
        definition: gloss.to_string(),
        examples: Vec::new(),
    })
}

/// Cleans up the gloss field of a data record and splits it. Fragments are
/// trimmed and an example consisting of a single quotation loses its quotes.
pub fn definition_and_examples(raw_gloss: &str) -> Gloss {
    let clean = raw_gloss.trim().trim_matches(|c| c == ';' || c == ' ');
    let gloss = split_gloss(clean);
    Gloss {
        definition: gloss.definition.trim().to_string(),
        examples: gloss
            .examples
            .iter()
            .map(|ex| unquote(ex.trim()).to_string())
            .collect(),
    }
}

fn unquote(example: &str) -> &str {
    if example.len() >= 2
        && example.matches('"').count() == 2
        && example.starts_with('"')
        && example.ends_with('"')
    {
        &example[1..example.len() - 1]
    } else {
        example
    }
}

struct GlossParser {
    text: Vec<char>,
}

impl GlossParser {
    fn new(text: &str) -> GlossParser {
        GlossParser {
            text: text.chars().collect(),
        }
    }

    fn slice(&self, range: Range<usize>) -> String {
        self.text[range].iter().collect()
    }

    fn at(&self, p: usize) -> Option<char> {
        self.text.get(p).copied()
    }

    fn is(&self, p: usize, c: char) -> bool {
        self.at(p) == Some(c)
    }

    fn eos(&self, p: usize) -> bool {
        p >= self.text.len()
    }

    fn alnum(&self, p: usize) -> bool {
        self.at(p).map_or(false, |c| c.is_ascii_alphanumeric())
    }

    // SPACE*
    fn spaces(&self, mut p: usize) -> usize {
        while self.is(p, ' ') {
            p += 1;
        }
        p
    }

    // Start <- SPACE* Gloss EOS
    fn parse(&self) -> Option<(Range<usize>, Vec<Range<usize>>)> {
        let (end, definition, examples) = self.gloss(self.spaces(0));
        if self.eos(end) {
            Some((definition, examples))
        } else {
            None
        }
    }

    // Gloss <- Definition DELIM Examples / Definition Examples / "" Examples
    fn gloss(&self, p: usize) -> (usize, Range<usize>, Vec<Range<usize>>) {
        match self.definition(p) {
            Some((q, definition)) => {
                let (end, examples) = self.examples(self.delim(q).unwrap_or(q));
                (end, definition, examples)
            }
            None => {
                let (end, examples) = self.examples(p);
                (end, p..p, examples)
            }
        }
    }

    // Definition <- !'"' ( (!DELIM DefContent)+ '"'? ) SPACE*
    fn definition(&self, p: usize) -> Option<(usize, Range<usize>)> {
        if self.is(p, '"') {
            return None;
        }
        let mut q = p;
        while self.delim(q).is_none() {
            match self.def_content(q) {
                Some(r) => q = r,
                None => break,
            }
        }
        if q == p {
            return None;
        }
        if self.is(q, '"') {
            q += 1;
        }
        Some((self.spaces(q), p..q))
    }

    fn def_content(&self, p: usize) -> Option<usize> {
        // e.g., eg: E.g.;
        if matches!(self.at(p), Some('E' | 'e')) {
            let mut q = p + 1;
            if self.is(q, '.') {
                q += 1;
            }
            if matches!(self.at(q), Some('G' | 'g')) {
                q += 1;
                if self.is(q, '.') {
                    q += 1;
                }
                return Some(self.delim(q).unwrap_or(q));
            }
        }

        // parentheticals are assumed to be closed
        if self.is(p, '(') {
            let mut q = p + 1;
            while matches!(self.at(q), Some(c) if c != ')') {
                q += 1;
            }
            if self.is(q, ')') {
                return Some(q + 1);
            }
        }

        // a quoted "word" inside the definition
        if self.is(p, '"') && self.alnum(p + 1) {
            if let Some(q) = self.quote(p) {
                return Some(q);
            }
        }

        // inch marks, as in 13" cards
        if self.alnum(p) && self.is(p + 1, '"') {
            let q = p + 2;
            let after = if self.is(q, ' ') {
                Some(self.spaces(q))
            } else if let Some(r) = self.delim(q) {
                Some(r)
            } else if self.eos(q) {
                Some(q)
            } else {
                None
            };
            if matches!(after, Some(r) if !self.is(r, '"')) {
                return Some(q);
            }
        }

        match self.at(p) {
            Some(c) if c != '"' => Some(p + 1),
            _ => None,
        }
    }

    // Examples <- Example ((EXDELIM / SPACE* &'"') Example)* / ''
    fn examples(&self, p: usize) -> (usize, Vec<Range<usize>>) {
        let mut examples = Vec::new();
        let mut q = match self.example(p) {
            Some(q) => q,
            None => return (p, examples),
        };
        examples.push(p..q);
        loop {
            let separated = self.exdelim(q).or_else(|| {
                let r = self.spaces(q);
                if self.is(r, '"') {
                    Some(r)
                } else {
                    None
                }
            });
            let start = match separated {
                Some(r) => r,
                None => break,
            };
            match self.example(start) {
                Some(end) => {
                    examples.push(start..end);
                    q = end;
                }
                None => break,
            }
        }
        (q, examples)
    }

    // Example <- Quote (NonQuote Quote?)* ('"' &(DELIM / SPACE* EOS))? / '"' .*
    fn example(&self, p: usize) -> Option<usize> {
        if let Some(mut q) = self.quote(p) {
            while let Some(r) = self.non_quote(q) {
                q = self.quote(r).unwrap_or(r);
            }
            if self.is(q, '"') && (self.delim(q + 1).is_some() || self.eos(self.spaces(q + 1))) {
                q += 1;
            }
            return Some(q);
        }
        // missing the final quote
        if self.is(p, '"') {
            return Some(self.text.len());
        }
        None
    }

    // Quote <- '"' '"'? InQuote* '"' ('"' !ALNUM)?
    fn quote(&self, p: usize) -> Option<usize> {
        if !self.is(p, '"') {
            return None;
        }
        let mut q = p + 1;
        if self.is(q, '"') {
            q += 1;
        }
        while let Some(r) = self.in_quote(q) {
            q = r;
        }
        if !self.is(q, '"') {
            return None;
        }
        q += 1;
        if self.is(q, '"') && !self.alnum(q + 1) {
            q += 1;
        }
        Some(q)
    }

    // InQuote <- !'"' . / '"' ALNUM
    fn in_quote(&self, p: usize) -> Option<usize> {
        match self.at(p)? {
            // typos such as I"m
            '"' if self.alnum(p + 1) => Some(p + 2),
            '"' => None,
            _ => Some(p + 1),
        }
    }

    // NonQuote <- SPACE* (!(EXDELIM / '"') .)+ ','? SPACE*
    fn non_quote(&self, p: usize) -> Option<usize> {
        let start = self.spaces(p);
        let mut q = start;
        while matches!(self.at(q), Some(c) if c != '"') && self.exdelim(q).is_none() {
            q += 1;
        }
        if q == start {
            return None;
        }
        if self.is(q, ',') {
            q += 1;
        }
        Some(self.spaces(q))
    }

    // DELIM <- [;:,] SPACE* &'"'
    fn delim(&self, p: usize) -> Option<usize> {
        if !matches!(self.at(p), Some(';' | ':' | ',')) {
            return None;
        }
        let q = self.spaces(p + 1);
        if self.is(q, '"') {
            Some(q)
        } else {
            None
        }
    }

    // EXDELIM <- SPACE* ([;:,] / 'or') SPACE* &'"'
    fn exdelim(&self, p: usize) -> Option<usize> {
        let mut q = self.spaces(p);
        if matches!(self.at(q), Some(';' | ':' | ',')) {
            q += 1;
        } else if self.is(q, 'o') && self.is(q + 1, 'r') {
            q += 2;
        } else {
            return None;
        }
        let q = self.spaces(q);
        if self.is(q, '"') {
            Some(q)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn groups(s: &str) -> (String, Vec<String>) {
        let gloss = parse_gloss(s).unwrap();
        (gloss.definition, gloss.examples)
    }

    fn expect(definition: &str, examples: &[&str]) -> (String, Vec<String>) {
        (
            definition.to_string(),
            examples.iter().map(|e| e.to_string()).collect(),
        )
    }

    #[test]
    fn empty() {
        assert_eq!(groups(""), expect("", &[]));
        assert_eq!(groups(" "), expect("", &[]));
    }

    #[test]
    fn definition_only() {
        assert_eq!(groups("A definition"), expect("A definition", &[]));
        // multiple definitions stay together
        assert_eq!(
            groups("First definition; Second definition"),
            expect("First definition; Second definition", &[])
        );
    }

    #[test]
    fn delimiters() {
        assert_eq!(groups("def; \"ex\""), expect("def", &["\"ex\""]));
        assert_eq!(groups("def: \"ex\""), expect("def", &["\"ex\""]));
        assert_eq!(groups("def, \"ex\""), expect("def", &["\"ex\""]));
    }

    #[test]
    fn definition_with_quotes() {
        assert_eq!(groups("Defined as \"word\""), expect("Defined as \"word\"", &[]));
        assert_eq!(
            groups("Defined as \"word\"; \"ex\""),
            expect("Defined as \"word\"", &["\"ex\""])
        );
        assert_eq!(
            groups("A \"word\" or some other \"word\""),
            expect("A \"word\" or some other \"word\"", &[])
        );
    }

    #[test]
    fn definition_with_quote_characters() {
        assert_eq!(groups("some definition\""), expect("some definition\"", &[]));
        assert_eq!(
            groups("some definition\"; \"ex\""),
            expect("some definition\"", &["\"ex\""])
        );
        assert_eq!(
            groups("some definition\" \"ex\""),
            expect("some definition\"", &["\"ex\""])
        );
        assert_eq!(
            groups("some 1\" definition; \"ex\""),
            expect("some 1\" definition", &["\"ex\""])
        );
    }

    #[test]
    fn definition_with_parentheses() {
        assert_eq!(
            groups("(informal) a definition"),
            expect("(informal) a definition", &[])
        );
        assert_eq!(
            groups("something (or: \"other\"); \"ex\""),
            expect("something (or: \"other\")", &["\"ex\""])
        );
    }

    #[test]
    fn definition_with_eg() {
        assert_eq!(
            groups("definition: e.g., \"word\"; \"ex\""),
            expect("definition: e.g., \"word\"", &["\"ex\""])
        );
        assert_eq!(groups("eg \"word\""), expect("eg \"word\"", &[]));
    }

    #[test]
    fn examples_only() {
        assert_eq!(groups("\"example\""), expect("", &["\"example\""]));
        assert_eq!(
            groups("\"ex1\"; \"ex2\""),
            expect("", &["\"ex1\"", "\"ex2\""])
        );
    }

    #[test]
    fn dialogue() {
        assert_eq!(
            groups("definition; \"Hi,\" they said"),
            expect("definition", &["\"Hi,\" they said"])
        );
        assert_eq!(
            groups("\"What,\" she asked, \"is that?\"; \"Ask again\""),
            expect("", &["\"What,\" she asked, \"is that?\"", "\"Ask again\""])
        );
    }

    #[test]
    fn extra_quotes() {
        assert_eq!(
            groups("definition: \"\"word\"; \"again\"\""),
            expect("definition", &["\"\"word\"", "\"again\"\""])
        );
        assert_eq!(
            groups("definition: \"word\"\"; \"\"again\""),
            expect("definition", &["\"word\"\"", "\"\"again\""])
        );
        assert_eq!(
            groups("def: \"word\" is a word\""),
            expect("def", &["\"word\" is a word\""])
        );
    }

    #[test]
    fn missing_final_quote() {
        assert_eq!(groups("def; \"example"), expect("def", &["\"example"]));
    }

    #[test]
    fn examples_without_delimiter() {
        assert_eq!(
            groups("def; \"ex1\"\"ex2\""),
            expect("def", &["\"ex1\"", "\"ex2\""])
        );
        assert_eq!(
            groups("def; \"ex1\" \"ex2\""),
            expect("def", &["\"ex1\"", "\"ex2\""])
        );
        assert_eq!(
            groups("def; \"ex1\"; \"ex2\" \"ex3\""),
            expect("def", &["\"ex1\"", "\"ex2\"", "\"ex3\""])
        );
    }

    #[test]
    fn examples_with_author() {
        assert_eq!(
            groups("def; \"ex1\" - an author"),
            expect("def", &["\"ex1\" - an author"])
        );
        assert_eq!(
            groups("def; \"ex2\"; \"ex1\" - an author"),
            expect("def", &["\"ex2\"", "\"ex1\" - an author"])
        );
    }

    #[test]
    fn undelimited_text_is_left_alone() {
        for s in [
            "able to do something",
            "(of persons) having little or no hair on the scalp",
            "a unit of length equal to 12 inches; the basic unit",
            "sum: the whole amount",
            "the 13\" television",
        ] {
            let gloss = split_gloss(s);
            assert_eq!(gloss.definition, s);
            assert!(gloss.examples.is_empty());
        }
    }

    #[test]
    fn record_glosses() {
        let gloss =
            definition_and_examples(" able to do something; \"she was able to swim\"  \n");
        assert_eq!(gloss.definition, "able to do something");
        assert_eq!(gloss.examples, vec!["she was able to swim"]);

        let gloss = definition_and_examples(" def; \"Hi,\" they said; \"ex2\"  ");
        assert_eq!(gloss.examples, vec!["\"Hi,\" they said", "ex2"]);

        let gloss = definition_and_examples(" \"only an example\"; ");
        assert_eq!(gloss.definition, "");
        assert_eq!(gloss.examples, vec!["only an example"]);
    }
}
