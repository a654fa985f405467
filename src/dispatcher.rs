//! Intent execution: turns a resolved intent into the view it renders.

use crate::aggregate;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::intent::{match_intent, normalize_query, Intent, IntentRule, INTENT_RULES};
use crate::risk::RiskTier;
use crate::schema::{
    CONTRACT, GENDER, INTERNET_SERVICE, NOT_CHURNED, PAYMENT_METHOD, SENIOR_CITIZEN, TENURE,
    TIER_TABLE_LIMIT, TOP_N_LIMIT,
};
use crate::view::{Bar, View};
use tracing::{debug, warn};

pub const FALLBACK_TEXT: &str =
    "Sorry, I didn't understand that. Try selecting one of the sample questions.";

/// Maps a free-text query to an intent and computes its view.
#[derive(Debug, Clone, Copy)]
pub struct QueryDispatcher {
    rules: &'static [IntentRule],
}

impl Default for QueryDispatcher {
    fn default() -> Self {
        Self::new(INTENT_RULES)
    }
}

impl QueryDispatcher {
    pub fn new(rules: &'static [IntentRule]) -> Self {
        Self { rules }
    }

    pub fn resolve(&self, query: &str) -> Intent {
        match_intent(self.rules, &normalize_query(query))
    }

    pub fn dispatch(&self, dataset: &Dataset, query: &str) -> Result<View> {
        let intent = self.resolve(query);
        debug!("Query {:?} resolved to {:?}", query, intent);
        self.execute(dataset, intent)
    }

    pub fn execute(&self, dataset: &Dataset, intent: Intent) -> Result<View> {
        match intent {
            Intent::HighRiskCustomers => tier_table(dataset, RiskTier::High, "High Risk Customers (Top 10)"),
            Intent::LowRiskCount => {
                let count = aggregate::count_in_tier(dataset, RiskTier::Low)?;
                Ok(View::message(format!("Total Low-Risk Customers: {}", count)))
            }
            Intent::MediumRiskCount => {
                let count = aggregate::count_in_tier(dataset, RiskTier::Medium)?;
                Ok(View::message(format!("Total Medium-Risk Customers: {}", count)))
            }
            Intent::LowRiskCustomers => tier_table(dataset, RiskTier::Low, "Low-Risk Customers (Top 10)"),
            Intent::MediumRiskCustomers => {
                tier_table(dataset, RiskTier::Medium, "Medium-Risk Customers (Top 10)")
            }
            Intent::AverageChurnProbability => {
                let mean = aggregate::mean_probability(dataset)?.unwrap_or(f64::NAN);
                Ok(View::message(format!("Average Churn Probability: {:.2}", mean)))
            }
            Intent::ChurnByContract => churned_chart(dataset, CONTRACT, "Churn Count by Contract"),
            Intent::HighRiskCount => {
                let count = aggregate::count_in_tier(dataset, RiskTier::High)?;
                Ok(View::message(format!("Total High-Risk Customers: {}", count)))
            }
            Intent::ActiveCustomers => {
                let count = aggregate::count_with_churn(dataset, NOT_CHURNED)?;
                Ok(View::message(format!("Active (Non-Churned) Customers: {}", count)))
            }
            Intent::ChurnByGender => churned_chart(dataset, GENDER, "Churn by Gender"),
            Intent::ChurnByInternetService => {
                churned_chart(dataset, INTERNET_SERVICE, "Churn by Internet Service")
            }
            Intent::ChurnRateByPaymentMethod => when_column_present(dataset, PAYMENT_METHOD, |ds| {
                let bars = aggregate::churn_rate_by(ds, PAYMENT_METHOD)?;
                Ok(View::chart("Churn Rate by Payment Method", bars))
            }),
            Intent::TopChurnRisk => {
                let top = aggregate::top_by_probability(dataset, TOP_N_LIMIT)?;
                Ok(View::table("Top 5 Customers by Churn Probability", top))
            }
            Intent::TenureOfChurned => {
                churned_chart(dataset, TENURE, "Tenure Distribution of Churned Customers")
            }
            Intent::ChurnBySeniorCitizen => {
                churned_chart(dataset, SENIOR_CITIZEN, "Churn by Senior Citizen Status")
            }
            Intent::Unrecognized => Ok(View::warning(FALLBACK_TEXT)),
        }
    }
}

fn tier_table(dataset: &Dataset, tier: RiskTier, title: &str) -> Result<View> {
    let rows = aggregate::rows_in_tier(dataset, tier, TIER_TABLE_LIMIT)?;
    Ok(View::table(title, rows))
}

fn churned_chart(dataset: &Dataset, column: &str, title: &str) -> Result<View> {
    when_column_present(dataset, column, |ds| {
        let bars: Vec<Bar> = aggregate::churned_counts_by(ds, column)?;
        Ok(View::chart(title, bars))
    })
}

/// Run `f` only if the dataset exposes `column`; otherwise degrade to a
/// warning naming it.
fn when_column_present<F>(dataset: &Dataset, column: &str, f: F) -> Result<View>
where
    F: FnOnce(&Dataset) -> Result<View>,
{
    if !dataset.has_column(column) {
        warn!("Column '{}' not present, returning warning view", column);
        return Ok(View::warning(format!("'{}' column not found in your data.", column)));
    }
    f(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ChurnError;
    use crate::risk;
    use polars::prelude::*;

    fn classified(frame: DataFrame) -> Dataset {
        let mut dataset = Dataset::new(frame);
        risk::classify(&mut dataset).unwrap();
        dataset
    }

    fn message_text(view: View) -> String {
        match view {
            View::Message { text } => text,
            other => panic!("expected message, got {:?}", other.kind()),
        }
    }

    fn warning_text(view: View) -> String {
        match view {
            View::Warning { text } => text,
            other => panic!("expected warning, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_average_formats_two_decimals() {
        let dataset = classified(
            df![
                "Predicted Churn Risk" => [0.2, 0.8],
                "Actual Churn(Yes/No)" => ["No", "Yes"]
            ]
            .unwrap(),
        );
        let text = message_text(
            QueryDispatcher::default()
                .dispatch(&dataset, "What is the average churn probability?")
                .unwrap(),
        );
        assert!(text.contains("0.50"), "{}", text);
    }

    #[test]
    fn test_low_risk_listing_is_first_ten_in_order() {
        let probs: Vec<f64> = (0..12).map(|i| i as f64 / 100.0).collect();
        let ids: Vec<i64> = (0..12).collect();
        let dataset = classified(
            df![
                "customerID" => ids,
                "Predicted Churn Risk" => probs
            ]
            .unwrap(),
        );

        match QueryDispatcher::default()
            .dispatch(&dataset, "Who are the low risk customers?")
            .unwrap()
        {
            View::Table { title, frame } => {
                assert_eq!(title, "Low-Risk Customers (Top 10)");
                let got: Vec<Option<i64>> =
                    frame.column("customerID").unwrap().i64().unwrap().into_iter().collect();
                let want: Vec<Option<i64>> = (0..10).map(Some).collect();
                assert_eq!(got, want);
            }
            other => panic!("expected table, got {}", other.kind()),
        }
    }

    #[test]
    fn test_how_many_high_risk_lists_rows() {
        let dataset = classified(df!["Predicted Churn Risk" => [0.9, 0.95, 0.1]].unwrap());
        let view = QueryDispatcher::default()
            .dispatch(&dataset, "how many high risk customers")
            .unwrap();
        assert_eq!(view.kind(), "table");
    }

    #[test]
    fn test_counts() {
        let dataset = classified(
            df![
                "Predicted Churn Risk" => [0.9, 0.6, 0.3, 0.2],
                "Actual Churn(Yes/No)" => ["Yes", "No", "No", "No"]
            ]
            .unwrap(),
        );
        let dispatcher = QueryDispatcher::default();
        assert_eq!(
            message_text(dispatcher.dispatch(&dataset, "low risk count").unwrap()),
            "Total Low-Risk Customers: 2"
        );
        assert_eq!(
            message_text(dispatcher.dispatch(&dataset, "count medium risk").unwrap()),
            "Total Medium-Risk Customers: 1"
        );
        assert_eq!(
            message_text(dispatcher.dispatch(&dataset, "active customers").unwrap()),
            "Active (Non-Churned) Customers: 3"
        );
        assert_eq!(
            message_text(dispatcher.execute(&dataset, Intent::HighRiskCount).unwrap()),
            "Total High-Risk Customers: 1"
        );
    }

    #[test]
    fn test_payment_rate_zero_when_no_churn() {
        let dataset = classified(
            df![
                "Predicted Churn Risk" => [0.1, 0.1, 0.1, 0.1, 0.1, 0.9, 0.9],
                "Actual Churn(Yes/No)" => ["No", "No", "No", "No", "No", "Yes", "No"],
                "PaymentMethod" => [
                    "Mailed check", "Mailed check", "Mailed check", "Mailed check", "Mailed check",
                    "Electronic check", "Electronic check"
                ]
            ]
            .unwrap(),
        );
        match QueryDispatcher::default()
            .dispatch(&dataset, "Churn by payment method")
            .unwrap()
        {
            View::Chart { title, bars } => {
                assert_eq!(title, "Churn Rate by Payment Method");
                assert_eq!(
                    bars,
                    vec![
                        Bar { label: "Electronic check".into(), value: 0.5 },
                        Bar { label: "Mailed check".into(), value: 0.0 },
                    ]
                );
            }
            other => panic!("expected chart, got {}", other.kind()),
        }
    }

    #[test]
    fn test_missing_optional_columns_degrade_to_warning() {
        let dataset = classified(
            df![
                "Predicted Churn Risk" => [0.9],
                "Actual Churn(Yes/No)" => ["Yes"]
            ]
            .unwrap(),
        );
        let dispatcher = QueryDispatcher::default();
        for (query, column) in [
            ("Which gender has more churned customers?", "gender"),
            ("Show churn count by Senior Citizen", "SeniorCitizen"),
            ("What is the churn count by contract?", "Contract"),
            ("Churn by internet service", "InternetService"),
            ("Churn by payment method", "PaymentMethod"),
            ("Tenure distribution of churned customers", "tenure"),
        ] {
            let text = warning_text(dispatcher.dispatch(&dataset, query).unwrap());
            assert_eq!(text, format!("'{}' column not found in your data.", column));
        }
    }

    #[test]
    fn test_missing_required_column_is_an_error() {
        let dataset = Dataset::new(df!["Predicted Churn Risk" => [0.9]].unwrap());
        let err = QueryDispatcher::default()
            .dispatch(&dataset, "active customers")
            .unwrap_err();
        assert!(matches!(err, ChurnError::MissingColumn(_)));
    }

    #[test]
    fn test_fallback() {
        let dataset = classified(df!["Predicted Churn Risk" => [0.9]].unwrap());
        let text = warning_text(QueryDispatcher::default().dispatch(&dataset, "hello").unwrap());
        assert_eq!(text, FALLBACK_TEXT);
    }

    #[test]
    fn test_gender_chart() {
        let dataset = classified(
            df![
                "Predicted Churn Risk" => [0.9, 0.8, 0.7],
                "Actual Churn(Yes/No)" => ["Yes", "Yes", "No"],
                "gender" => ["Male", "Female", "Female"]
            ]
            .unwrap(),
        );
        match QueryDispatcher::default().dispatch(&dataset, "gender").unwrap() {
            View::Chart { bars, .. } => {
                let labels: Vec<&str> = bars.iter().map(|b| b.label.as_str()).collect();
                assert_eq!(labels, vec!["Female", "Male"]);
                assert!(bars.iter().all(|b| b.value == 1.0));
            }
            other => panic!("expected chart, got {}", other.kind()),
        }
    }
}
