use crate::error::AppError;
use serde::Deserialize;
use std::collections::HashSet;

/// A fixed category descriptor. `color` is a display tag only; scoring reads
/// `keywords` and `sender_patterns`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClusterTemplate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub sender_patterns: Vec<String>,
}

fn default_color() -> String {
    "gray-500".to_string()
}

impl ClusterTemplate {
    fn from_static(
        name: &str,
        description: &str,
        color: &str,
        keywords: &[&str],
        sender_patterns: &[&str],
    ) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            color: color.to_string(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
            sender_patterns: sender_patterns.iter().map(|p| (*p).to_string()).collect(),
        }
    }

    fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        for k in &mut self.keywords {
            *k = k.to_lowercase();
        }
        for p in &mut self.sender_patterns {
            *p = p.to_lowercase();
        }
        self
    }
}

/// Validated, ordered template table. The first entry is the fallback for
/// messages that match nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    templates: Vec<ClusterTemplate>,
}

impl TemplateSet {
    pub fn new(templates: Vec<ClusterTemplate>) -> Result<Self, AppError> {
        validate(&templates)?;
        Ok(Self {
            templates: templates
                .into_iter()
                .map(ClusterTemplate::normalized)
                .collect(),
        })
    }

    pub fn builtin() -> Self {
        Self {
            templates: vec![
                ClusterTemplate::from_static(
                    "Work Communications",
                    "Project updates, meeting invites, and team communications from colleagues and stakeholders.",
                    "blue-500",
                    &[
                        "meeting", "project", "deadline", "standup", "review", "team", "work",
                        "office", "schedule", "conference",
                    ],
                    &["@company", ".com", "noreply", "team", "hr", "admin"],
                ),
                ClusterTemplate::from_static(
                    "Newsletters & Updates",
                    "Industry newsletters, product updates, and promotional content from various subscriptions.",
                    "green-500",
                    &[
                        "newsletter", "update", "news", "announcement", "feature", "release",
                        "blog", "article", "digest",
                    ],
                    &["newsletter", "news", "updates", "marketing", "blog"],
                ),
                ClusterTemplate::from_static(
                    "Financial & Bills",
                    "Bank statements, credit card bills, invoices, and financial notifications requiring attention.",
                    "orange-500",
                    &[
                        "payment", "invoice", "bill", "statement", "due", "account",
                        "transaction", "balance", "charge", "receipt",
                    ],
                    &[
                        "bank", "card", "payment", "billing", "invoice", "finance", "stripe",
                        "paypal",
                    ],
                ),
                ClusterTemplate::from_static(
                    "Social & Personal",
                    "Personal messages, social media notifications, and communications from friends and family.",
                    "purple-500",
                    &[
                        "like", "comment", "follow", "connection", "friend", "family",
                        "personal", "social",
                    ],
                    &[
                        "facebook", "twitter", "linkedin", "instagram", "social", "personal",
                    ],
                ),
                ClusterTemplate::from_static(
                    "Shopping & Services",
                    "Order confirmations, shipping notifications, and service-related communications from various providers.",
                    "pink-500",
                    &[
                        "order", "shipping", "delivery", "shipped", "confirmed", "receipt",
                        "purchase", "tracking",
                    ],
                    &[
                        "amazon", "ebay", "shop", "store", "order", "shipping", "delivery",
                        "uber", "lyft",
                    ],
                ),
            ],
        }
    }

    pub fn as_slice(&self) -> &[ClusterTemplate] {
        &self.templates
    }

    pub fn default_template(&self) -> &ClusterTemplate {
        // Construction guarantees at least one template.
        &self.templates[0]
    }

    pub fn get(&self, name: &str) -> Option<&ClusterTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for TemplateSet {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Checks the preconditions `classify` relies on: a non-empty list and a
/// unique, non-blank name per template.
pub fn validate(templates: &[ClusterTemplate]) -> Result<(), AppError> {
    if templates.is_empty() {
        return Err(AppError::InvalidConfiguration(
            "at least one cluster template is required".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for template in templates {
        let name = template.name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidConfiguration(
                "cluster template name must not be blank".to_string(),
            ));
        }
        if !seen.insert(name) {
            return Err(AppError::InvalidConfiguration(format!(
                "duplicate cluster template name: {name}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(name: &str) -> ClusterTemplate {
        ClusterTemplate {
            name: name.to_string(),
            description: String::new(),
            color: default_color(),
            keywords: Vec::new(),
            sender_patterns: Vec::new(),
        }
    }

    #[test]
    fn builtin_starts_with_work_fallback() {
        let set = TemplateSet::builtin();
        assert_eq!(set.len(), 5);
        assert_eq!(set.default_template().name, "Work Communications");
        assert!(validate(set.as_slice()).is_ok());
    }

    #[test]
    fn empty_list_is_rejected() {
        let err = TemplateSet::new(Vec::new()).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfiguration(_)));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let err = TemplateSet::new(vec![template("Bills"), template(" Bills ")]).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfiguration(msg) if msg.contains("Bills")));
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = TemplateSet::new(vec![template("  ")]).unwrap_err();
        assert!(matches!(err, AppError::InvalidConfiguration(_)));
    }

    #[test]
    fn keywords_are_lowercased() {
        let mut t = template("Travel");
        t.keywords = vec!["Flight".to_string()];
        t.sender_patterns = vec!["@Airline".to_string()];
        let set = TemplateSet::new(vec![t]).unwrap();
        let travel = set.get("Travel").unwrap();
        assert_eq!(travel.keywords, vec!["flight"]);
        assert_eq!(travel.sender_patterns, vec!["@airline"]);
    }
}
