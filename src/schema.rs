//! Column names and fixed labels of the churn prediction dataset.
//!
//! Names are exact and case-sensitive; the loader trims surrounding
//! whitespace from header cells before they are compared against these.

/// Model output: probability that the customer churns.
pub const PREDICTED_CHURN_RISK: &str = "Predicted Churn Risk";

/// Ground truth churn flag, "Yes" or "No".
pub const ACTUAL_CHURN: &str = "Actual Churn(Yes/No)";

/// Derived tier column, "High" / "Medium" / "Low".
pub const RISK_LEVEL: &str = "Risk Level";

pub const CONTRACT: &str = "Contract";
pub const GENDER: &str = "gender";
pub const INTERNET_SERVICE: &str = "InternetService";
pub const PAYMENT_METHOD: &str = "PaymentMethod";
pub const TENURE: &str = "tenure";
pub const SENIOR_CITIZEN: &str = "SeniorCitizen";

pub const CHURNED: &str = "Yes";
pub const NOT_CHURNED: &str = "No";

/// Columns an uploaded file must carry.
pub const REQUIRED_COLUMNS: [&str; 3] = [PREDICTED_CHURN_RISK, ACTUAL_CHURN, RISK_LEVEL];

/// Bundled dataset, resolved relative to the working directory.
pub const DEFAULT_DATA_FILE: &str = "Churn_predictions.csv";

/// Probability above which a customer is "High" risk.
pub const HIGH_RISK_THRESHOLD: f64 = 0.75;

/// Probability above which a customer is at least "Medium" risk.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.5;

/// Rows shown for a tier listing.
pub const TIER_TABLE_LIMIT: usize = 10;

/// Rows shown for the top-N listing.
pub const TOP_N_LIMIT: usize = 5;
