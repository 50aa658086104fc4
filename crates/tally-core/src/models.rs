//! Domain models for Tally

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Message shown when a required field is blank
pub const MSG_MISSING_FIELDS: &str = "Please fill in all fields";

/// Message shown when an amount is zero, negative or not a number
pub const MSG_INVALID_AMOUNT: &str = "Please enter a valid positive amount";

/// Lowercase and drop everything but letters/digits, so "Food & Dining",
/// "food-dining" and "FOOD_DINING" compare equal
fn slug(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Expense categories offered by the entry form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Food & Dining")]
    FoodAndDining,
    Transportation,
    Shopping,
    Entertainment,
    #[serde(rename = "Bills & Utilities")]
    BillsAndUtilities,
    Healthcare,
    Travel,
    Education,
    Other,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Self::FoodAndDining,
        Self::Transportation,
        Self::Shopping,
        Self::Entertainment,
        Self::BillsAndUtilities,
        Self::Healthcare,
        Self::Travel,
        Self::Education,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FoodAndDining => "Food & Dining",
            Self::Transportation => "Transportation",
            Self::Shopping => "Shopping",
            Self::Entertainment => "Entertainment",
            Self::BillsAndUtilities => "Bills & Utilities",
            Self::Healthcare => "Healthcare",
            Self::Travel => "Travel",
            Self::Education => "Education",
            Self::Other => "Other",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = slug(s);
        Self::ALL
            .into_iter()
            .find(|c| slug(c.as_str()) == wanted)
            .ok_or_else(|| format!("Unknown category: {}", s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How an expense was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    DebitCard,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
    #[serde(rename = "Mobile Payment")]
    MobilePayment,
    Check,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 6] = [
        Self::Cash,
        Self::CreditCard,
        Self::DebitCard,
        Self::BankTransfer,
        Self::MobilePayment,
        Self::Check,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "Cash",
            Self::CreditCard => "Credit Card",
            Self::DebitCard => "Debit Card",
            Self::BankTransfer => "Bank Transfer",
            Self::MobilePayment => "Mobile Payment",
            Self::Check => "Check",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = slug(s);
        Self::ALL
            .into_iter()
            .find(|m| slug(m.as_str()) == wanted)
            .ok_or_else(|| format!("Unknown payment method: {}", s))
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded expense
///
/// Serialized with camelCase keys; this is the layout of the persisted
/// `expenses` document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: String,
    pub date: NaiveDate,
    /// Free text, conventionally a [`Category`] label
    pub category: String,
    pub description: String,
    pub amount: f64,
    /// Free text, conventionally a [`PaymentMethod`] label
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

/// A new expense to be added (before id/timestamp assignment)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub date: NaiveDate,
    pub category: String,
    pub description: String,
    pub amount: f64,
    pub payment_method: String,
}

impl NewExpense {
    pub fn new(
        date: NaiveDate,
        category: impl Into<String>,
        description: impl Into<String>,
        amount: f64,
        payment_method: impl Into<String>,
    ) -> Self {
        Self {
            date,
            category: category.into(),
            description: description.into(),
            amount,
            payment_method: payment_method.into(),
        }
    }

    /// Check required fields and the amount
    pub fn validate(&self) -> Result<()> {
        if [&self.category, &self.description, &self.payment_method]
            .iter()
            .any(|s| s.trim().is_empty())
        {
            return Err(Error::Validation(MSG_MISSING_FIELDS.to_string()));
        }
        validate_amount(self.amount)
    }
}

/// Partial update: `None` fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseUpdate {
    pub date: Option<NaiveDate>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub payment_method: Option<String>,
}

impl ExpenseUpdate {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.category.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && self.payment_method.is_none()
    }

    /// Provided fields must satisfy the same rules as on creation
    pub fn validate(&self) -> Result<()> {
        let blank = [&self.category, &self.description, &self.payment_method]
            .iter()
            .any(|s| s.as_deref().is_some_and(|s| s.trim().is_empty()));
        if blank {
            return Err(Error::Validation(MSG_MISSING_FIELDS.to_string()));
        }
        match self.amount {
            Some(amount) => validate_amount(amount),
            None => Ok(()),
        }
    }

    /// Shallow merge over an existing record; `id` and `created_at` are never touched
    pub fn apply_to(&self, expense: &mut Expense) {
        if let Some(date) = self.date {
            expense.date = date;
        }
        if let Some(ref category) = self.category {
            expense.category = category.clone();
        }
        if let Some(ref description) = self.description {
            expense.description = description.clone();
        }
        if let Some(amount) = self.amount {
            expense.amount = amount;
        }
        if let Some(ref method) = self.payment_method {
            expense.payment_method = method.clone();
        }
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if amount.is_finite() && amount > 0.0 {
        Ok(())
    } else {
        Err(Error::Validation(MSG_INVALID_AMOUNT.to_string()))
    }
}

/// Sum of expenses for one month bucket, labelled "MMM YYYY"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month: String,
    pub total: f64,
}

/// Sum of expenses for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// The signed-in user as stored under `userData`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Expense {
        Expense {
            id: "1".to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            category: "Food & Dining".to_string(),
            description: "Lunch".to_string(),
            amount: 25.5,
            payment_method: "Cash".to_string(),
            created_at: "2025-01-10T12:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn test_category_parse_accepts_labels_and_slugs() {
        assert_eq!(
            "Food & Dining".parse::<Category>().unwrap(),
            Category::FoodAndDining
        );
        assert_eq!(
            "bills-utilities".parse::<Category>().unwrap(),
            Category::BillsAndUtilities
        );
        assert_eq!("TRAVEL".parse::<Category>().unwrap(), Category::Travel);
        assert!("Groceries".parse::<Category>().is_err());
    }

    #[test]
    fn test_payment_method_round_trips_through_label() {
        for method in PaymentMethod::ALL {
            assert_eq!(method.as_str().parse::<PaymentMethod>().unwrap(), method);
        }
        assert_eq!(
            "mobile_payment".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::MobilePayment
        );
    }

    #[test]
    fn test_expense_json_layout() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["date"], "2025-01-10");
        assert_eq!(json["paymentMethod"], "Cash");
        assert_eq!(json["amount"], 25.5);
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn test_expense_reads_browser_style_timestamps() {
        let raw = r#"{"id":"1","date":"2025-01-10","category":"Other","description":"x",
            "amount":3,"paymentMethod":"Cash","createdAt":"2025-01-10T08:30:00.000Z"}"#;
        let expense: Expense = serde_json::from_str(raw).unwrap();
        assert_eq!(expense.amount, 3.0);
        assert_eq!(expense.created_at.to_rfc3339(), "2025-01-10T08:30:00+00:00");
    }

    #[test]
    fn test_new_expense_validation() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        assert!(NewExpense::new(date, "Other", "Pens", 3.0, "Cash")
            .validate()
            .is_ok());

        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = NewExpense::new(date, "Other", "Pens", amount, "Cash")
                .validate()
                .unwrap_err();
            assert_eq!(err.to_string(), MSG_INVALID_AMOUNT);
        }

        let err = NewExpense::new(date, "Other", "   ", 3.0, "Cash")
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), MSG_MISSING_FIELDS);
    }

    #[test]
    fn test_update_merges_only_provided_fields() {
        let mut expense = sample();
        let update = ExpenseUpdate {
            amount: Some(40.0),
            description: Some("Dinner".to_string()),
            ..Default::default()
        };
        update.apply_to(&mut expense);

        assert_eq!(expense.amount, 40.0);
        assert_eq!(expense.description, "Dinner");
        assert_eq!(expense.category, "Food & Dining");
        assert_eq!(expense.id, "1");
    }

    #[test]
    fn test_update_validation() {
        assert!(ExpenseUpdate::default().is_empty());
        assert!(ExpenseUpdate::default().validate().is_ok());

        let bad_amount = ExpenseUpdate {
            amount: Some(0.0),
            ..Default::default()
        };
        assert!(bad_amount.validate().is_err());

        let blank = ExpenseUpdate {
            category: Some(String::new()),
            ..Default::default()
        };
        assert!(blank.validate().is_err());
    }
}
