//! Sense keys, e.g. `able%5:00:00:capable:00`.
//!
//! See <https://wordnet.princeton.edu/documentation/senseidx5wn>.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Result, WndbError};
use crate::tables::SynsetType;

static SENSE_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(.+)%([1-5]):(\d{2}):(\d{2}):([^:]*):(\d{2})?$").expect("sense key regex")
});

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SenseKeyComponents {
    pub lemma: String,
    pub ss_type_idx: u8,
    pub lex_filenum: u32,
    pub lex_id: u32,
    /// Only satellites have a head word.
    pub head_word: String,
    pub head_id: u32,
}

impl SenseKeyComponents {
    pub fn ss_type(&self) -> Option<SynsetType> {
        SynsetType::from_index(self.ss_type_idx)
    }

    pub fn format(&self) -> String {
        format_sense_key(
            &self.lemma,
            self.ss_type_idx,
            self.lex_filenum,
            self.lex_id,
            &self.head_word,
            self.head_id,
        )
    }
}

pub fn format_sense_key(
    lemma: &str,
    ss_type_idx: u8,
    lex_filenum: u32,
    lex_id: u32,
    head_word: &str,
    head_id: u32,
) -> String {
    let h_id = if head_word.is_empty() {
        String::new()
    } else {
        format!("{:02}", head_id)
    };
    format!(
        "{}%{}:{:02}:{:02}:{}:{}",
        lemma, ss_type_idx, lex_filenum, lex_id, head_word, h_id
    )
}

pub fn split_sense_key(sense_key: &str) -> Result<SenseKeyComponents> {
    let invalid = || WndbError::InvalidSenseKey(sense_key.to_string());
    let caps = SENSE_KEY.captures(sense_key).ok_or_else(invalid)?;
    let num = |i: usize| -> Result<u32> {
        caps.get(i)
            .map_or(Ok(0), |m| m.as_str().parse::<u32>().map_err(|_| invalid()))
    };
    Ok(SenseKeyComponents {
        lemma: caps[1].to_string(),
        ss_type_idx: num(2)? as u8,
        lex_filenum: num(3)?,
        lex_id: num(4)?,
        head_word: caps[5].to_string(),
        head_id: num(6)?,
    })
}

/// The lemma part of a sense key.
pub fn sense_key_lemma(sense_key: &str) -> &str {
    sense_key.rsplit_once('%').map_or("", |(lemma, _)| lemma)
}

/// Drops adjective positions from satellite head words so keys from files
/// that do and do not record them compare equal.
pub fn normalize_sense_key(sense_key: &str) -> String {
    match sense_key.rsplit_once(':') {
        Some((key, head_id)) => {
            let key = ["(a)", "(p)", "(ip)"]
                .iter()
                .find_map(|suffix| key.strip_suffix(suffix))
                .unwrap_or(key);
            format!("{}:{}", key, head_id)
        }
        None => sense_key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let keys = [
            SenseKeyComponents {
                lemma: "entity".to_string(),
                ss_type_idx: 1,
                lex_filenum: 3,
                lex_id: 0,
                head_word: String::new(),
                head_id: 0,
            },
            SenseKeyComponents {
                lemma: "comptable".to_string(),
                ss_type_idx: 5,
                lex_filenum: 0,
                lex_id: 2,
                head_word: "able".to_string(),
                head_id: 1,
            },
            SenseKeyComponents {
                lemma: "a.m.".to_string(),
                ss_type_idx: 4,
                lex_filenum: 2,
                lex_id: 15,
                head_word: String::new(),
                head_id: 0,
            },
        ];
        for components in keys {
            assert_eq!(split_sense_key(&components.format()).unwrap(), components);
        }
    }

    #[test]
    fn formatting() {
        assert_eq!(format_sense_key("entity", 1, 3, 0, "", 0), "entity%1:03:00::");
        assert_eq!(
            format_sense_key("comptable", 5, 0, 0, "able", 0),
            "comptable%5:00:00:able:00"
        );
    }

    #[test]
    fn splitting() {
        let c = split_sense_key("100%5:00:00:cardinal:00").unwrap();
        assert_eq!(c.lemma, "100");
        assert_eq!(c.ss_type(), Some(SynsetType::AdjectiveSatellite));
        assert_eq!(c.head_word, "cardinal");
        // lemmas may themselves contain a percent sign
        assert_eq!(split_sense_key("50%_off%1:07:00::").unwrap().lemma, "50%_off");
        assert!(split_sense_key("entity").is_err());
        assert!(split_sense_key("entity%9:03:00::").is_err());
        assert!(split_sense_key("entity%1:3:00::").is_err());
    }

    #[test]
    fn lemma_and_normalization() {
        assert_eq!(sense_key_lemma("a.m.%4:02:00::"), "a.m.");
        assert_eq!(
            normalize_sense_key("able%5:00:00:capable(p):00"),
            "able%5:00:00:capable:00"
        );
        assert_eq!(normalize_sense_key("entity%1:03:00::"), "entity%1:03:00::");
    }
}
