//! Built-in structural heuristics
//!
//! These run regardless of what the pattern store contains, against both the
//! raw and the normalized text. They catch the shapes gambling spam keeps
//! reusing: contact handles, deposit amounts, casino vocabulary and
//! symbol-padded digits.

use once_cell::sync::Lazy;
use regex::Regex;

/// A named group of regexes. The heuristic fires if any of them matches.
pub struct Heuristic {
    pub name: &'static str,
    patterns: Vec<Regex>,
}

impl Heuristic {
    fn new(name: &'static str, patterns: &[&str]) -> Self {
        Self {
            name,
            patterns: patterns
                .iter()
                .map(|p| Regex::new(p).expect("built-in heuristic must compile"))
                .collect(),
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }
}

/// The heuristic battery, in evaluation order.
pub static BUILTIN_HEURISTICS: Lazy<Vec<Heuristic>> = Lazy::new(|| {
    vec![
        Heuristic::new("contact_handle", &[r"(?i)[@＠][a-z0-9._]+"]),
        Heuristic::new(
            "line_id",
            &[
                // Latin keywords need a boundary and a colon, otherwise "video" is an id
                r"(?i)(?:\bline\s*id|\bline|\bid|ไลน์|ไอดี|แอด)\s*[:：]\s*[@＠]?[a-z0-9._]+",
                r"(?i)(?:ไลน์|ไอดี|แอด)\s*[@＠]?[a-z0-9._]{3,}",
            ],
        ),
        Heuristic::new(
            "deposit_amount",
            &[
                r"(?i)(?:ฝาก|เล่น).*?[0-9๐-๙]+.*?(?:บาท|฿|บ)",
                r"(?i)[0-9๐-๙]+.*?(?:บาท|฿|บ).*?(?:ฝาก|เล่น)",
            ],
        ),
        Heuristic::new(
            "gambling_vocabulary",
            &[
                r"(?i)(?:สล็อต|บาคาร่า|คาสิโน|เว็[บพ]พนัน|sa\s*gaming)",
                r"(?i)\b(?:slots?|baccarat|casino)\b",
                r"(?i)เว็[บพ]ตรง.*?(?:ฝาก.*?ถอน|ถอน.*?ฝาก)",
                r"(?i)เครดิต.*?ฟรี.*?(?:สล็อต|บาคาร่า|คาสิโน|เว็[บพ])",
            ],
        ),
        Heuristic::new(
            "obfuscated_gambling_term",
            &[
                r"(?i)[^\w\s]+(?:สล็อต|บาคาร่า|คาสิโน)|(?:สล็อต|บาคาร่า|คาสิโน)[^\w\s]+",
                r"(?i)[@＠][a-z0-9._]+[^\w\s]*?(?:สล็อต|บาคาร่า|คาสิโน)",
            ],
        ),
        Heuristic::new(
            "digit_symbol_interleave",
            &[r"(?i)(?:[0-9๐-๙]+[^a-z0-9\s]{1,2}){2,}"],
        ),
    ]
});

/// Names of every heuristic that fires on `raw` or `normalized`, in battery
/// order, each at most once.
pub fn matching_heuristics(raw: &str, normalized: &str) -> Vec<&'static str> {
    BUILTIN_HEURISTICS
        .iter()
        .filter(|h| h.is_match(raw) || h.is_match(normalized))
        .map(|h| h.name)
        .collect()
}
