//! Intent matching: an ordered table of substring triggers.
//!
//! Rules are tried top to bottom and the first whose trigger matches wins.
//! Several triggers overlap ("low risk" vs "low risk" + "count"), so the order
//! of [`INTENT_RULES`] is part of the behavior.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    HighRiskCustomers,
    LowRiskCount,
    MediumRiskCount,
    LowRiskCustomers,
    MediumRiskCustomers,
    AverageChurnProbability,
    ChurnByContract,
    HighRiskCount,
    ActiveCustomers,
    ChurnByGender,
    ChurnByInternetService,
    ChurnRateByPaymentMethod,
    TopChurnRisk,
    TenureOfChurned,
    ChurnBySeniorCitizen,
    Unrecognized,
}

/// Keyword condition over a lower-cased query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Every keyword must occur.
    All(&'static [&'static str]),
    /// At least one keyword must occur.
    Any(&'static [&'static str]),
}

impl Trigger {
    pub fn matches(&self, query: &str) -> bool {
        match self {
            Trigger::All(words) => words.iter().all(|w| query.contains(w)),
            Trigger::Any(words) => words.iter().any(|w| query.contains(w)),
        }
    }

    /// True if every query matching `other` also matches `self`, judged on
    /// keywords alone.
    pub fn subsumes(&self, other: &Trigger) -> bool {
        match (self, other) {
            (Trigger::All(mine), Trigger::All(theirs)) => {
                mine.iter().all(|w| theirs.contains(w))
            }
            (Trigger::Any(mine), Trigger::All(theirs)) => {
                mine.iter().any(|w| theirs.contains(w))
            }
            (Trigger::Any(mine), Trigger::Any(theirs)) => {
                theirs.iter().all(|w| mine.contains(w))
            }
            (Trigger::All(mine), Trigger::Any(theirs)) => {
                mine.len() == 1 && theirs.iter().all(|w| *w == mine[0])
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IntentRule {
    pub intent: Intent,
    pub trigger: Trigger,
}

const fn all(intent: Intent, words: &'static [&'static str]) -> IntentRule {
    IntentRule {
        intent,
        trigger: Trigger::All(words),
    }
}

const fn any(intent: Intent, words: &'static [&'static str]) -> IntentRule {
    IntentRule {
        intent,
        trigger: Trigger::Any(words),
    }
}

/// The dispatch table, in evaluation order.
///
/// `HighRiskCount` can never fire: any query containing "how many" and
/// "high risk" is taken by `HighRiskCustomers` first. It stays in place so
/// the table keeps its established order; see [`shadowed_intents`].
pub const INTENT_RULES: &[IntentRule] = &[
    all(Intent::HighRiskCustomers, &["high risk"]),
    all(Intent::LowRiskCount, &["low risk", "count"]),
    all(Intent::MediumRiskCount, &["medium risk", "count"]),
    all(Intent::LowRiskCustomers, &["low risk"]),
    all(Intent::MediumRiskCustomers, &["medium risk"]),
    all(Intent::AverageChurnProbability, &["average", "churn"]),
    all(Intent::ChurnByContract, &["contract", "churn"]),
    all(Intent::HighRiskCount, &["how many", "high risk"]),
    any(Intent::ActiveCustomers, &["active", "not churned"]),
    all(Intent::ChurnByGender, &["gender"]),
    all(Intent::ChurnByInternetService, &["internet"]),
    all(Intent::ChurnRateByPaymentMethod, &["payment"]),
    all(Intent::TopChurnRisk, &["top 5"]),
    all(Intent::TenureOfChurned, &["tenure"]),
    all(Intent::ChurnBySeniorCitizen, &["senior"]),
];

/// Lower-case a raw query the way the rule table expects it.
pub fn normalize_query(query: &str) -> String {
    query.to_lowercase()
}

/// First matching intent for an already-normalized query.
pub fn match_intent(rules: &[IntentRule], query: &str) -> Intent {
    rules
        .iter()
        .find(|rule| rule.trigger.matches(query))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Unrecognized)
}

/// Intents that an earlier rule always pre-empts.
pub fn shadowed_intents(rules: &[IntentRule]) -> Vec<Intent> {
    rules
        .iter()
        .enumerate()
        .filter(|(idx, rule)| {
            rules[..*idx]
                .iter()
                .any(|earlier| earlier.trigger.subsumes(&rule.trigger))
        })
        .map(|(_, rule)| rule.intent)
        .collect()
}
