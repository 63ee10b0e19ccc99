use super::template::ClusterTemplate;
use crate::message::Message;

pub const KEYWORD_WEIGHT: u32 = 2;
pub const SENDER_PATTERN_WEIGHT: u32 = 3;

/// Scores how well `message` fits `template`.
///
/// Each keyword found anywhere in subject, snippet or sender adds
/// [`KEYWORD_WEIGHT`]; each pattern found in the sender adds
/// [`SENDER_PATTERN_WEIGHT`]. Matching is a presence test on lower-cased
/// text, so a keyword repeated in the message still counts once.
pub fn score_match(message: &Message, template: &ClusterTemplate) -> u32 {
    let sender = message.sender.as_deref().unwrap_or("").to_lowercase();
    let text = format!(
        "{} {} {}",
        message.subject.as_deref().unwrap_or(""),
        message.snippet.as_deref().unwrap_or(""),
        sender
    )
    .to_lowercase();

    let keyword_hits = template
        .keywords
        .iter()
        .filter(|k| text.contains(k.to_lowercase().as_str()))
        .count() as u32;
    let sender_hits = template
        .sender_patterns
        .iter()
        .filter(|p| sender.contains(p.to_lowercase().as_str()))
        .count() as u32;

    keyword_hits * KEYWORD_WEIGHT + sender_hits * SENDER_PATTERN_WEIGHT
}

/// Picks the index of the best-scoring template and its score.
///
/// A later template replaces the current best only on a strictly greater
/// score, so ties go to the earliest template. When nothing scores, index 0
/// (the fallback) is returned with score 0. `None` for an empty slice.
pub fn best_match(message: &Message, templates: &[ClusterTemplate]) -> Option<(usize, u32)> {
    if templates.is_empty() {
        return None;
    }

    let mut best = (0, 0);
    for (idx, template) in templates.iter().enumerate() {
        let score = score_match(message, template);
        if score > best.1 {
            best = (idx, score);
        }
    }
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(keywords: &[&str], patterns: &[&str]) -> ClusterTemplate {
        ClusterTemplate {
            name: "T".to_string(),
            description: String::new(),
            color: "blue-500".to_string(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            sender_patterns: patterns.iter().map(|p| (*p).to_string()).collect(),
        }
    }

    #[test]
    fn keywords_and_patterns_add_up() {
        let t = template(&["invoice", "due", "refund"], &["billing", "paypal"]);
        let msg = Message::new(1, "Invoice #42", "billing@acme.io", "Payment due Friday");
        assert_eq!(score_match(&msg, &t), 2 * 2 + 3);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let t = template(&["meeting"], &["@company"]);
        let msg = Message::new(1, "MEETING moved", "Boss@Company.COM", "");
        assert_eq!(score_match(&msg, &t), 5);
    }

    #[test]
    fn repeated_keyword_counts_once() {
        let t = template(&["statement"], &[]);
        let msg = Message::new(1, "Statement", "x@y.z", "statement statement statement");
        assert_eq!(score_match(&msg, &t), 2);
    }

    #[test]
    fn keyword_can_match_inside_sender() {
        let t = template(&["news"], &[]);
        let msg = Message::new(1, "", "daily@news.example", "");
        assert_eq!(score_match(&msg, &t), 2);
    }

    #[test]
    fn absent_fields_score_zero() {
        let t = template(&["order"], &["amazon"]);
        let msg = Message {
            uid: 1,
            subject: None,
            sender: None,
            snippet: None,
        };
        assert_eq!(score_match(&msg, &t), 0);
    }

    #[test]
    fn tie_goes_to_earliest_template() {
        let ts = vec![
            template(&["zeta"], &[]),
            template(&["alpha"], &[]),
            template(&["alpha"], &[]),
        ];
        let msg = Message::new(1, "alpha", "", "");
        assert_eq!(best_match(&msg, &ts), Some((1, 2)));
    }

    #[test]
    fn no_signal_falls_back_to_first() {
        let ts = vec![template(&["a1"], &[]), template(&["b2"], &[])];
        let msg = Message::new(1, "hello", "x@y.z", "");
        assert_eq!(best_match(&msg, &ts), Some((0, 0)));
        assert_eq!(best_match(&msg, &[]), None);
    }
}
