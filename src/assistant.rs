//! Churn Assistant - one session over one dataset snapshot
//!
//! The assistant owns the dataset: it is loaded, classified once, and from
//! then on only read by the dispatcher.

use crate::dataset::Dataset;
use crate::dispatcher::QueryDispatcher;
use crate::error::Result;
use crate::intent::Intent;
use crate::loader::{DataLoader, DataSource};
use crate::presenter::Presenter;
use crate::risk;
use crate::view::View;
use tracing::info;

/// The canned questions offered to the user, in menu order.
pub const SAMPLE_QUESTIONS: [&str; 13] = [
    "Who are the high risk customers?",
    "Who are the low risk customers?",
    "Who are the medium risk customers?",
    "What is the average churn probability?",
    "What is the churn count by contract?",
    "How many customers are at high risk?",
    "How many customers are currently active?",
    "Which gender has more churned customers?",
    "Churn by internet service",
    "Churn by payment method",
    "Top 5 customers by churn probability",
    "Tenure distribution of churned customers",
    "Show churn count by Senior Citizen",
];

pub struct ChurnAssistant {
    dataset: Dataset,
    dispatcher: QueryDispatcher,
}

impl ChurnAssistant {
    /// Take ownership of a dataset and derive its risk tiers if needed.
    pub fn new(mut dataset: Dataset) -> Result<Self> {
        let derived = risk::classify(&mut dataset)?;
        info!(
            "Assistant ready: {} rows, risk level {}",
            dataset.height(),
            if derived { "derived" } else { "provided" }
        );
        Ok(Self {
            dataset,
            dispatcher: QueryDispatcher::default(),
        })
    }

    /// Load from a source, reporting status through `presenter`.
    pub fn load(
        loader: &DataLoader,
        source: &DataSource,
        presenter: &mut dyn Presenter,
    ) -> Result<Self> {
        let dataset = loader.load(source, presenter)?;
        Self::new(dataset)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Answer a query. An empty query yields no view.
    pub fn ask(&self, query: &str) -> Result<Option<View>> {
        if query.is_empty() {
            return Ok(None);
        }
        let view = self.dispatcher.dispatch(&self.dataset, query)?;
        info!("Answered {:?} with a {} view", query, view.kind());
        Ok(Some(view))
    }

    pub fn resolve(&self, query: &str) -> Intent {
        self.dispatcher.resolve(query)
    }

    pub fn sample_questions() -> &'static [&'static str] {
        &SAMPLE_QUESTIONS
    }

    /// 1-based lookup into the sample question menu.
    pub fn sample_question(number: usize) -> Option<&'static str> {
        number
            .checked_sub(1)
            .and_then(|idx| SAMPLE_QUESTIONS.get(idx))
            .copied()
    }
}
