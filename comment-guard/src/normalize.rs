//! Text normalization
//!
//! Folds the homoglyphs spammers use to dodge keyword filters (mathematical
//! alphanumerics, fullwidth forms, circled letters) back to ASCII and strips
//! decoration. The result is only ever used for matching, never displayed.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Emoji that obfuscated spam uses as word separators.
const SEPARATOR_SYMBOLS: &[char] = &['👉', '🔥', '🎮', '💎', '💰', '💵', '🎲', '🎯', '🎰'];

/// Letterlike symbols standing in for the reserved holes of the
/// mathematical alphanumeric block.
const LETTERLIKE: &[(char, char)] = &[
    ('ℂ', 'C'),
    ('ℍ', 'H'),
    ('ℕ', 'N'),
    ('ℙ', 'P'),
    ('ℚ', 'Q'),
    ('ℝ', 'R'),
    ('ℤ', 'Z'),
    ('ℬ', 'B'),
    ('ℰ', 'E'),
    ('ℱ', 'F'),
    ('ℋ', 'H'),
    ('ℐ', 'I'),
    ('ℒ', 'L'),
    ('ℳ', 'M'),
    ('ℛ', 'R'),
    ('ℭ', 'C'),
    ('ℌ', 'H'),
    ('ℑ', 'I'),
    ('ℜ', 'R'),
    ('ℨ', 'Z'),
    ('ℯ', 'e'),
    ('ℊ', 'g'),
    ('ℴ', 'o'),
    ('ℎ', 'h'),
];

const MATH_LETTERS: (u32, u32) = (0x1D400, 0x1D6A3);
const MATH_DIGITS: (u32, u32) = (0x1D7CE, 0x1D7FF);
const FULLWIDTH_ASCII: (u32, u32) = (0xFF01, 0xFF5E);
const CIRCLED_UPPER: (u32, u32) = (0x24B6, 0x24CF);
const CIRCLED_LOWER: (u32, u32) = (0x24D0, 0x24E9);

/// Codepoint -> canonical character, built once.
static FOLD_TABLE: Lazy<HashMap<char, char>> = Lazy::new(build_fold_table);

fn build_fold_table() -> HashMap<char, char> {
    let mut table = HashMap::new();

    // 13 styles of 52 letters each, A-Z then a-z
    for cp in MATH_LETTERS.0..=MATH_LETTERS.1 {
        let offset = (cp - MATH_LETTERS.0) % 52;
        let ascii = if offset < 26 {
            b'A' + offset as u8
        } else {
            b'a' + (offset - 26) as u8
        };
        insert_cp(&mut table, cp, ascii as char);
    }

    // bold, double-struck, sans-serif, sans-serif bold, monospace
    for cp in MATH_DIGITS.0..=MATH_DIGITS.1 {
        let digit = b'0' + ((cp - MATH_DIGITS.0) % 10) as u8;
        insert_cp(&mut table, cp, digit as char);
    }

    for cp in FULLWIDTH_ASCII.0..=FULLWIDTH_ASCII.1 {
        if let Some(ascii) = char::from_u32(cp - 0xFEE0) {
            insert_cp(&mut table, cp, ascii);
        }
    }
    table.insert('\u{3000}', ' ');

    for cp in CIRCLED_UPPER.0..=CIRCLED_UPPER.1 {
        insert_cp(&mut table, cp, (b'A' + (cp - CIRCLED_UPPER.0) as u8) as char);
    }
    for cp in CIRCLED_LOWER.0..=CIRCLED_LOWER.1 {
        insert_cp(&mut table, cp, (b'a' + (cp - CIRCLED_LOWER.0) as u8) as char);
    }

    for &(from, to) in LETTERLIKE {
        table.insert(from, to);
    }

    for &symbol in SEPARATOR_SYMBOLS {
        table.insert(symbol, ' ');
    }

    table
}

fn insert_cp(table: &mut HashMap<char, char>, cp: u32, to: char) {
    // Reserved holes in the math block are not valid chars
    if let Some(from) = char::from_u32(cp) {
        table.insert(from, to);
    }
}

/// Thai vowel signs and tone marks. They are combining marks rather than
/// letters, but removing them mangles every Thai word.
fn is_thai_mark(c: char) -> bool {
    matches!(c, '\u{0E31}' | '\u{0E34}'..='\u{0E3A}' | '\u{0E47}'..='\u{0E4E}')
}

fn is_kept(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || matches!(c, '@' | '.' | '_') || is_thai_mark(c)
}

/// Canonicalize `text` for pattern matching.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .chars()
        .map(|c| FOLD_TABLE.get(&c).copied().unwrap_or(c))
        .filter(|&c| is_kept(c))
        .collect();

    folded.to_lowercase().trim().to_string()
}
