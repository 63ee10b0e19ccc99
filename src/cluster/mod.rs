pub mod scoring;
pub mod template;

use crate::error::AppError;
use crate::message::Message;
use template::ClusterTemplate;

pub use scoring::score_match;
pub use template::TemplateSet;

/// A message placed into a cluster, with the score that put it there.
/// Fallback placements carry score 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement<'a> {
    pub message: &'a Message,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClusterGroup<'a> {
    pub template: &'a ClusterTemplate,
    pub members: Vec<Placement<'a>>,
}

impl ClusterGroup<'_> {
    pub fn name(&self) -> &str {
        &self.template.name
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Result of [`classify`]: one group per template, in template order, keyed
/// by template name. Every input message sits in exactly one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment<'a> {
    groups: Vec<ClusterGroup<'a>>,
}

impl<'a> Assignment<'a> {
    pub fn get(&self, name: &str) -> Option<&ClusterGroup<'a>> {
        self.groups.iter().find(|g| g.name() == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClusterGroup<'a>> {
        self.groups.iter()
    }

    pub fn non_empty(&self) -> impl Iterator<Item = &ClusterGroup<'a>> {
        self.groups.iter().filter(|g| !g.is_empty())
    }

    /// Total number of placed messages.
    pub fn len(&self) -> usize {
        self.groups.iter().map(ClusterGroup::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partitions `messages` across `templates`.
///
/// Messages keep their input order inside each group. A message that scores
/// zero everywhere lands in the first template. Fails only when `templates`
/// is empty.
pub fn classify<'a>(
    messages: &'a [Message],
    templates: &'a [ClusterTemplate],
) -> Result<Assignment<'a>, AppError> {
    if templates.is_empty() {
        return Err(AppError::InvalidConfiguration(
            "cannot classify without cluster templates".to_string(),
        ));
    }

    let mut groups: Vec<ClusterGroup<'a>> = templates
        .iter()
        .map(|template| ClusterGroup {
            template,
            members: Vec::new(),
        })
        .collect();

    let mut fallbacks = 0usize;
    for message in messages {
        let (idx, score) = scoring::best_match(message, templates).unwrap_or((0, 0));
        if score == 0 {
            fallbacks += 1;
        }
        groups[idx].members.push(Placement { message, score });
    }

    tracing::debug!(
        messages = messages.len(),
        templates = templates.len(),
        fallbacks,
        "Categorized messages"
    );

    Ok(Assignment { groups })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn uids(assignment: &Assignment<'_>, name: &str) -> Vec<u32> {
        assignment
            .get(name)
            .map(|g| g.members.iter().map(|p| p.message.uid).collect())
            .unwrap_or_default()
    }

    fn sample_batch() -> Vec<Message> {
        vec![
            Message::new(
                1,
                "Q4 Planning Meeting Tomorrow",
                "manager@company.com",
                "Please prepare your quarterly reports",
            ),
            Message::new(
                2,
                "Your Credit Card Statement is Ready",
                "statements@bank.com",
                "Your December statement is now available",
            ),
            Message::new(3, "Hello", "x@y.z", ""),
            Message::new(
                4,
                "Your Amazon order has shipped",
                "shipment-tracking@amazon.com",
                "Your order #123-4567890 has been shipped",
            ),
            Message::new(
                5,
                "Sarah commented on your photo",
                "notify@facebook.com",
                "See the comment and like it",
            ),
        ]
    }

    #[test]
    fn work_email_goes_to_work_communications() {
        let set = TemplateSet::builtin();
        let batch = sample_batch();
        let assignment = classify(&batch[..1], set.as_slice()).unwrap();
        let work = assignment.get("Work Communications").unwrap();
        assert_eq!(work.members.len(), 1);
        // "meeting" keyword plus "@company" and ".com" sender patterns.
        assert_eq!(work.members[0].score, 8);
    }

    #[test]
    fn financial_email_goes_to_financial_and_bills() {
        let set = TemplateSet::builtin();
        let batch = sample_batch();
        let assignment = classify(&batch[1..2], set.as_slice()).unwrap();
        let finance = assignment.get("Financial & Bills").unwrap();
        assert_eq!(finance.members.len(), 1);
        assert!(finance.members[0].score >= 5);
    }

    #[test]
    fn no_signal_email_falls_back_with_zero_score() {
        let set = TemplateSet::builtin();
        let batch = sample_batch();
        let assignment = classify(&batch[2..3], set.as_slice()).unwrap();
        let fallback = assignment.get("Work Communications").unwrap();
        assert_eq!(fallback.members.len(), 1);
        assert_eq!(fallback.members[0].score, 0);
    }

    #[test]
    fn blank_message_falls_back_to_first_template() {
        let set = TemplateSet::builtin();
        let batch = vec![Message {
            uid: 9,
            subject: None,
            sender: None,
            snippet: None,
        }];
        let assignment = classify(&batch, set.as_slice()).unwrap();
        assert_eq!(uids(&assignment, "Work Communications"), vec![9]);
    }

    #[test]
    fn mixed_batch_is_partitioned_in_input_order() {
        let set = TemplateSet::builtin();
        let batch = sample_batch();
        let assignment = classify(&batch, set.as_slice()).unwrap();

        assert_eq!(uids(&assignment, "Work Communications"), vec![1, 3]);
        assert_eq!(uids(&assignment, "Financial & Bills"), vec![2]);
        assert_eq!(uids(&assignment, "Shopping & Services"), vec![4]);
        assert_eq!(uids(&assignment, "Social & Personal"), vec![5]);
        assert_eq!(uids(&assignment, "Newsletters & Updates"), Vec::<u32>::new());

        let mut all: Vec<u32> = assignment
            .iter()
            .flat_map(|g| g.members.iter().map(|p| p.message.uid))
            .collect();
        all.sort_unstable();
        assert_eq!(all, vec![1, 2, 3, 4, 5]);
        assert_eq!(assignment.len(), batch.len());
    }

    #[test]
    fn classification_is_deterministic() {
        let set = TemplateSet::builtin();
        let batch = sample_batch();
        let first = classify(&batch, set.as_slice()).unwrap();
        let second = classify(&batch, set.as_slice()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn every_message_lands_exactly_once() {
        let blank = Message {
            uid: 0,
            subject: None,
            sender: None,
            snippet: None,
        };
        let only_sender = Message {
            sender: Some("billing@paypal.com".to_string()),
            ..blank.clone()
        };
        let invoice = Message::new(7, "Invoice due", "billing@stripe.io", "Payment reminder");
        let news = Message::new(8, "Weekly digest", "newsletter@blog.dev", "New article");

        let batches: Vec<Vec<Message>> = vec![
            Vec::new(),
            vec![blank.clone()],
            vec![blank.clone(), blank.clone(), blank.clone()],
            vec![invoice.clone(), invoice.clone()],
            vec![news.clone(), only_sender.clone(), blank.clone(), news.clone()],
            sample_batch(),
            sample_batch().into_iter().chain(sample_batch()).collect(),
            vec![only_sender, invoice, news, blank],
        ];

        let set = TemplateSet::builtin();
        for batch in &batches {
            let assignment = classify(batch, set.as_slice()).unwrap();
            assert_eq!(assignment.iter().count(), set.len());
            assert_eq!(assignment.len(), batch.len());

            let mut seen = vec![0usize; batch.len()];
            for group in assignment.iter() {
                let positions: Vec<usize> = group
                    .members
                    .iter()
                    .map(|p| {
                        batch
                            .iter()
                            .position(|m| std::ptr::eq(m, p.message))
                            .unwrap()
                    })
                    .collect();
                assert!(positions.windows(2).all(|w| w[0] < w[1]));
                for pos in positions {
                    seen[pos] += 1;
                }
            }
            assert!(seen.iter().all(|&n| n == 1), "placements {seen:?}");

            assert_eq!(assignment, classify(batch, set.as_slice()).unwrap());
        }
    }

    #[test]
    fn empty_batch_keeps_every_template_key() {
        let set = TemplateSet::builtin();
        let assignment = classify(&[], set.as_slice()).unwrap();
        let names: Vec<&str> = assignment.iter().map(ClusterGroup::name).collect();
        assert_eq!(
            names,
            vec![
                "Work Communications",
                "Newsletters & Updates",
                "Financial & Bills",
                "Social & Personal",
                "Shopping & Services",
            ]
        );
        assert!(assignment.iter().all(ClusterGroup::is_empty));
        assert!(assignment.is_empty());
    }

    #[test]
    fn shared_keyword_tie_goes_to_earlier_template() {
        let shared = |name: &str| ClusterTemplate {
            name: name.to_string(),
            description: String::new(),
            color: "gray-500".to_string(),
            keywords: vec!["launch".to_string()],
            sender_patterns: Vec::new(),
        };
        let templates = vec![
            ClusterTemplate {
                keywords: vec!["unrelated".to_string()],
                ..shared("Default")
            },
            shared("Earlier"),
            shared("Later"),
        ];
        let batch = vec![Message::new(1, "Product launch", "x@y.z", "")];
        let assignment = classify(&batch, &templates).unwrap();
        assert_eq!(uids(&assignment, "Earlier"), vec![1]);
        assert_eq!(uids(&assignment, "Later"), Vec::<u32>::new());
    }

    #[test]
    fn empty_template_list_is_invalid_configuration() {
        let batch = sample_batch();
        let err = classify(&batch, &[]).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfiguration(_)));
    }
}
