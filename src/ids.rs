//! Identifiers of synsets, entries, senses and frames.
//!
//! Lemmas are escaped so that every id is a valid XML `ID`: characters that
//! may appear in an XML name pass through, everything else is spelled out
//! between hyphens (`a:b` becomes `a-colon-b`). A literal hyphen is doubled
//! so the escapes cannot collide with the input.

use log::warn;

use crate::tables::{PartOfSpeech, SynsetType};

pub fn synset_id(lexicon: &str, offset: u32, ss_type: SynsetType) -> String {
    format!("{}-{:08}-{}", lexicon, offset, ss_type)
}

pub fn entry_id(lexicon: &str, lemma: &str, pos: PartOfSpeech) -> String {
    format!("{}-{}-{}", lexicon, escape_lemma(lemma), pos)
}

pub fn sense_id(lexicon: &str, lemma: &str, offset: u32, ss_type: SynsetType) -> String {
    format!("{}-{}-{:08}-{}", lexicon, escape_lemma(lemma), offset, ss_type)
}

pub fn frame_id(f_num: u32) -> String {
    format!("frame-{}", f_num)
}

/// NLTK-style synset name, e.g. `dog.n.01`.
pub fn nltk_synset_name(lemma: &str, ss_type: SynsetType, sense_num: u32) -> String {
    format!("{}.{}.{:02}", lemma.to_lowercase(), ss_type, sense_num)
}

pub fn escape_lemma(lemma: &str) -> String {
    let mut escaped = String::with_capacity(lemma.len());
    for c in lemma.chars() {
        if is_name_char(c) {
            escaped.push(c);
        } else if let Some(esc) = custom_escape(c) {
            escaped.push_str(esc);
        } else if let Some(name) = entity_name(c) {
            escaped.push('-');
            escaped.push_str(name);
            escaped.push('-');
        } else {
            let esc = format!("-{:04X}-", c as u32);
            warn!("no escape character defined for {:?}; using {}", c, esc);
            escaped.push_str(&esc);
        }
    }
    escaped
}

fn is_name_char(c: char) -> bool {
    let cp = c as u32;
    c.is_ascii_alphanumeric()
        || c == '.'
        || c == '·'
        || (0xC0..=0xD6).contains(&cp)
        || (0xD8..=0xF6).contains(&cp)
        || (0xF8..=0x2FF).contains(&cp)
        || (0x300..=0x36F).contains(&cp)
        || (0x370..=0x37D).contains(&cp)
        || (0x37F..=0x1FFF).contains(&cp)
        || matches!(cp, 0x200C | 0x200D | 0x203F | 0x2040)
        || (0x2C00..=0x2FEF).contains(&cp)
        || (0x3001..=0xD7FF).contains(&cp)
        || (0xF900..=0xFDCF).contains(&cp)
        || (0xFDF0..=0xFFFD).contains(&cp)
        || (0x10000..=0xEFFFF).contains(&cp)
}

fn custom_escape(c: char) -> Option<&'static str> {
    Some(match c {
        ' ' => "_",
        '!' => "-excl-",
        '#' => "-num-",
        '$' => "-dollar-",
        '%' => "-percnt-",
        '\'' => "-apos-",
        '(' => "-lpar-",
        ')' => "-rpar-",
        '*' => "-ast-",
        '+' => "-plus-",
        ',' => "-comma-",
        '-' => "--",
        '/' => "-sol-",
        ':' => "-colon-",
        ';' => "-semi-",
        '=' => "-equals-",
        '?' => "-quest-",
        '@' => "-commat-",
        '[' => "-lsqb-",
        '\\' => "-bsol-",
        ']' => "-rsqb-",
        '^' => "-Hat-",
        '_' => "-lowbar-",
        '`' => "-grave-",
        '{' => "-lbrace-",
        '|' => "-vert-",
        '}' => "-rbrace-",
        _ => return None,
    })
}

/// HTML 4 entity names for the characters not covered above.
fn entity_name(c: char) -> Option<&'static str> {
    Some(match c as u32 {
        0x22 => "quot",
        0x26 => "amp",
        0x3C => "lt",
        0x3E => "gt",
        0xA0 => "nbsp",
        0xA1 => "iexcl",
        0xA2 => "cent",
        0xA3 => "pound",
        0xA4 => "curren",
        0xA5 => "yen",
        0xA6 => "brvbar",
        0xA7 => "sect",
        0xA8 => "uml",
        0xA9 => "copy",
        0xAA => "ordf",
        0xAB => "laquo",
        0xAC => "not",
        0xAD => "shy",
        0xAE => "reg",
        0xAF => "macr",
        0xB0 => "deg",
        0xB1 => "plusmn",
        0xB2 => "sup2",
        0xB3 => "sup3",
        0xB4 => "acute",
        0xB5 => "micro",
        0xB6 => "para",
        0xB8 => "cedil",
        0xB9 => "sup1",
        0xBA => "ordm",
        0xBB => "raquo",
        0xBC => "frac14",
        0xBD => "frac12",
        0xBE => "frac34",
        0xBF => "iquest",
        0xD7 => "times",
        0xF7 => "divide",
        0x2002 => "ensp",
        0x2003 => "emsp",
        0x2009 => "thinsp",
        0x200E => "lrm",
        0x200F => "rlm",
        0x2013 => "ndash",
        0x2014 => "mdash",
        0x2018 => "lsquo",
        0x2019 => "rsquo",
        0x201A => "sbquo",
        0x201C => "ldquo",
        0x201D => "rdquo",
        0x201E => "bdquo",
        0x2020 => "dagger",
        0x2021 => "Dagger",
        0x2022 => "bull",
        0x2026 => "hellip",
        0x2030 => "permil",
        0x2032 => "prime",
        0x2033 => "Prime",
        0x2039 => "lsaquo",
        0x203A => "rsaquo",
        0x203E => "oline",
        0x2044 => "frasl",
        0x20AC => "euro",
        0x2111 => "image",
        0x2118 => "weierp",
        0x211C => "real",
        0x2122 => "trade",
        0x2135 => "alefsym",
        0x2190 => "larr",
        0x2191 => "uarr",
        0x2192 => "rarr",
        0x2193 => "darr",
        0x2194 => "harr",
        0x21B5 => "crarr",
        0x21D0 => "lArr",
        0x21D1 => "uArr",
        0x21D2 => "rArr",
        0x21D3 => "dArr",
        0x21D4 => "hArr",
        0x2200 => "forall",
        0x2202 => "part",
        0x2203 => "exist",
        0x2205 => "empty",
        0x2207 => "nabla",
        0x2208 => "isin",
        0x2209 => "notin",
        0x220B => "ni",
        0x220F => "prod",
        0x2211 => "sum",
        0x2212 => "minus",
        0x2217 => "lowast",
        0x221A => "radic",
        0x221D => "prop",
        0x221E => "infin",
        0x2220 => "ang",
        0x2227 => "and",
        0x2228 => "or",
        0x2229 => "cap",
        0x222A => "cup",
        0x222B => "int",
        0x2234 => "there4",
        0x223C => "sim",
        0x2245 => "cong",
        0x2248 => "asymp",
        0x2260 => "ne",
        0x2261 => "equiv",
        0x2264 => "le",
        0x2265 => "ge",
        0x2282 => "sub",
        0x2283 => "sup",
        0x2284 => "nsub",
        0x2286 => "sube",
        0x2287 => "supe",
        0x2295 => "oplus",
        0x2297 => "otimes",
        0x22A5 => "perp",
        0x22C5 => "sdot",
        0x2308 => "lceil",
        0x2309 => "rceil",
        0x230A => "lfloor",
        0x230B => "rfloor",
        0x2329 => "lang",
        0x232A => "rang",
        0x25CA => "loz",
        0x2660 => "spades",
        0x2663 => "clubs",
        0x2665 => "hearts",
        0x2666 => "diams",
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape() {
        assert_eq!(escape_lemma("abc"), "abc");
        assert_eq!(escape_lemma("a.b.c"), "a.b.c");
        assert_eq!(escape_lemma("protégé"), "protégé");
        assert_eq!(escape_lemma("a b c"), "a_b_c");
        assert_eq!(escape_lemma("a:b:c"), "a-colon-b-colon-c");
        assert_eq!(escape_lemma("a-b-c"), "a--b--c");
        assert_eq!(escape_lemma("a´b´c"), "a-acute-b-acute-c");
        assert_eq!(escape_lemma("a_b_c"), "a-lowbar-b-lowbar-c");
        assert_eq!(escape_lemma("AT&T"), "AT-amp-T");
        assert_eq!(escape_lemma("a~b"), "a-007E-b");
    }

    #[test]
    fn escapes_do_not_collide() {
        let lemmas = ["a-b", "a_b", "a b", "a-lowbar-b", "a--b", "a:b", "a-colon-b"];
        let mut escaped: Vec<String> = lemmas.iter().map(|l| escape_lemma(l)).collect();
        escaped.sort();
        escaped.dedup();
        assert_eq!(escaped.len(), lemmas.len());
    }

    #[test]
    fn ids() {
        assert_eq!(synset_id("ewn", 1740, SynsetType::Noun), "ewn-00001740-n");
        assert_eq!(
            synset_id("ewn", 2098, SynsetType::AdjectiveSatellite),
            "ewn-00002098-s"
        );
        assert_eq!(
            entry_id("ewn", "Ice Age", PartOfSpeech::Noun),
            "ewn-Ice_Age-n"
        );
        assert_eq!(
            sense_id("ewn", "able", 1740, SynsetType::Adjective),
            "ewn-able-00001740-a"
        );
        assert_eq!(frame_id(8), "frame-8");
        assert_eq!(nltk_synset_name("Dog", SynsetType::Noun, 1), "dog.n.01");
    }
}
