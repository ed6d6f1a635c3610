//! Parsing of the classifier's three-line reply

use once_cell::sync::Lazy;
use regex::Regex;

use super::{ClassifierLabel, ClassifierVerdict};

static CONTROL_TOKENS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<\|[^|>\n]*\|>|上下文").expect("control token regex must compile"));

static ROLE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*(?:assistant|user|system)\s*:?\s*$").expect("role line regex must compile")
});

const SCORE_TAGS: &[&str] = &["score", "confidence", "คะแนน"];
const LABEL_TAGS: &[&str] = &["result", "label", "verdict", "ผลวิเคราะห์"];
const REASON_TAGS: &[&str] = &["reason", "rationale", "เหตุผล"];

#[derive(Debug, PartialEq, Eq)]
enum Tag {
    Score,
    Label,
    Reason,
}

/// Remove chat-template markup that some local servers leak into replies.
pub fn strip_control_tokens(reply: &str) -> String {
    let without_tokens = CONTROL_TOKENS.replace_all(reply, "");
    ROLE_LINE.replace_all(&without_tokens, "").into_owned()
}

/// Parse a reply into a verdict.
///
/// A reply without a usable score line is `Uncertain` with confidence 0.
pub fn parse_reply(reply: &str) -> ClassifierVerdict {
    let cleaned = strip_control_tokens(reply);

    let mut confidence = None;
    let mut label = ClassifierLabel::Uncertain;
    let mut rationale = None;

    for line in cleaned.lines().map(str::trim).filter(|l| !l.is_empty()) {
        let Some((tag, value)) = split_tag(line) else {
            continue;
        };
        match tag {
            Tag::Score => {
                if confidence.is_none() {
                    confidence = parse_score(value);
                }
            }
            Tag::Label => label = parse_label(value),
            Tag::Reason => {
                if !value.is_empty() {
                    rationale = Some(value.to_string());
                }
            }
        }
    }

    let verdict = match confidence {
        Some(confidence) => ClassifierVerdict::new(confidence, label),
        None => ClassifierVerdict::uncertain(),
    };

    match rationale {
        Some(rationale) => verdict.with_rationale(rationale),
        None => verdict,
    }
}

/// Split `score: 85` / `**Score**: 85` / `คะแนน： 85` into tag and value.
fn split_tag(line: &str) -> Option<(Tag, &str)> {
    let (key, value) = line.split_once([':', '：'])?;
    let key = key
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '*' | '-' | '#' | '_'))
        .to_lowercase();
    let value = value.trim_matches(|c: char| c.is_whitespace() || c == '*');

    let tag = if SCORE_TAGS.contains(&key.as_str()) {
        Tag::Score
    } else if LABEL_TAGS.contains(&key.as_str()) {
        Tag::Label
    } else if REASON_TAGS.contains(&key.as_str()) {
        Tag::Reason
    } else {
        return None;
    };

    Some((tag, value))
}

/// Value of an ASCII, Thai or fullwidth decimal digit.
fn digit_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => c.to_digit(10),
        '๐'..='๙' => Some(c as u32 - '๐' as u32),
        '０'..='９' => Some(c as u32 - '０' as u32),
        _ => None,
    }
}

/// First run of digits in `value`, clamped to 100.
fn parse_score(value: &str) -> Option<u8> {
    let mut digits = value
        .chars()
        .skip_while(|c| digit_value(*c).is_none())
        .map_while(digit_value)
        .peekable();
    digits.peek()?;

    let score = digits.fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(d));
    Some(score.min(100) as u8)
}

fn parse_label(value: &str) -> ClassifierLabel {
    let value = value.to_lowercase();
    // Thai is written without spaces, so only Latin terms are matched as words
    let words: Vec<&str> = value
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let has_word = |word: &str| words.contains(&word);

    if has_word("uncertain") || has_word("unsure") || value.contains("ไม่แน่ใจ") {
        ClassifierLabel::Uncertain
    } else if has_word("not") || has_word("ham") || value.contains("ไม่ใช่") {
        ClassifierLabel::NotSpam
    } else if value.contains("spam") || value.contains("สแปม") {
        ClassifierLabel::Spam
    } else {
        ClassifierLabel::Uncertain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_english_reply() {
        let verdict = parse_reply("score: 92\nresult: spam\nreason: Promotes a casino with a LINE id");

        assert_eq!(verdict.confidence, 92);
        assert_eq!(verdict.label, ClassifierLabel::Spam);
        assert_eq!(verdict.rationale.as_deref(), Some("Promotes a casino with a LINE id"));
    }

    #[test]
    fn test_parse_thai_reply() {
        let verdict = parse_reply("คะแนน: 15\nผลวิเคราะห์: ไม่ใช่สแปม\nเหตุผล: เป็นความคิดเห็นทั่วไป");

        assert_eq!(verdict.confidence, 15);
        assert_eq!(verdict.label, ClassifierLabel::NotSpam);
        assert_eq!(verdict.rationale.as_deref(), Some("เป็นความคิดเห็นทั่วไป"));
    }

    #[test]
    fn test_negated_label_is_not_spam() {
        assert_eq!(parse_label("not spam"), ClassifierLabel::NotSpam);
        assert_eq!(parse_label("ไม่ใช่สแปม"), ClassifierLabel::NotSpam);
        assert_eq!(parse_label("ไม่แน่ใจ"), ClassifierLabel::Uncertain);
        assert_eq!(parse_label("SPAM"), ClassifierLabel::Spam);
        assert_eq!(parse_label("maybe?"), ClassifierLabel::Uncertain);
    }

    #[test]
    fn test_label_matches_whole_words() {
        assert_eq!(parse_label("cannot determine"), ClassifierLabel::Uncertain);
        assert_eq!(parse_label("shampoo review"), ClassifierLabel::Uncertain);
        assert_eq!(parse_label("not_spam"), ClassifierLabel::NotSpam);
        assert_eq!(parse_label("ham"), ClassifierLabel::NotSpam);
        assert_eq!(parse_label("cannot say, looks like spam"), ClassifierLabel::Spam);
    }

    #[test]
    fn test_missing_score_line_is_uncertain_zero() {
        let verdict = parse_reply("result: spam\nreason: looks like an ad");

        assert_eq!(verdict.confidence, 0);
        assert_eq!(verdict.label, ClassifierLabel::Uncertain);
        assert_eq!(verdict.rationale.as_deref(), Some("looks like an ad"));
    }

    #[test]
    fn test_free_text_reply_is_uncertain_zero() {
        let verdict = parse_reply("I think this might be spam, 90 percent sure.");
        assert_eq!(verdict, ClassifierVerdict::uncertain());
    }

    #[test]
    fn test_score_without_number_is_uncertain_zero() {
        let verdict = parse_reply("score: high\nresult: spam");
        assert_eq!(verdict.confidence, 0);
        assert_eq!(verdict.label, ClassifierLabel::Uncertain);
    }

    #[test]
    fn test_score_is_clamped() {
        assert_eq!(parse_reply("score: 150").confidence, 100);
        assert_eq!(parse_reply("score: 99999999999999").confidence, 100);
    }

    #[test]
    fn test_control_tokens_are_stripped() {
        let reply = "<|im_start|>assistant\nscore: 88\nresult: spam\nreason: casino ad<|im_end|>";
        let verdict = parse_reply(reply);

        assert_eq!(verdict.confidence, 88);
        assert_eq!(verdict.label, ClassifierLabel::Spam);
        assert_eq!(verdict.rationale.as_deref(), Some("casino ad"));
    }

    #[test]
    fn test_role_words_inside_rationale_survive() {
        let verdict = parse_reply("score: 10\nresult: not spam\nreason: the user asks about the assistant");
        assert_eq!(verdict.rationale.as_deref(), Some("the user asks about the assistant"));
    }

    #[test]
    fn test_markdown_decorated_tags() {
        let verdict = parse_reply("**Score:** 70/100\n- Result: spam\n**Reason**: ad");

        assert_eq!(verdict.confidence, 70);
        assert_eq!(verdict.label, ClassifierLabel::Spam);
        assert_eq!(verdict.rationale.as_deref(), Some("ad"));
    }

    #[test]
    fn test_thai_digit_score() {
        let verdict = parse_reply("คะแนน: ๑๕\nผลวิเคราะห์: ไม่ใช่สแปม");

        assert_eq!(verdict.confidence, 15);
        assert_eq!(verdict.label, ClassifierLabel::NotSpam);
    }

    #[test]
    fn test_fullwidth_digit_score() {
        assert_eq!(parse_reply("score: ８５\nresult: spam").confidence, 85);
        assert_eq!(parse_reply("score: ８5").confidence, 85);
    }

    #[test]
    fn test_other_script_digits_are_uncertain_zero() {
        // Arabic-Indic digits are not read as a score
        let verdict = parse_reply("score: ٨٥\nresult: spam");
        assert_eq!(verdict, ClassifierVerdict::uncertain());
    }

    #[test]
    fn test_fullwidth_colon() {
        assert_eq!(parse_reply("score：64").confidence, 64);
    }
}
