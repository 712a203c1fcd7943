use rust_decimal::Decimal;

/// Placeholder title stored when an expense is entered without one.
pub const DEFAULT_EXPENSE_TITLE: &str = "Expense";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    pub id: Option<i64>,
    pub title: String,
    pub amount: Decimal,
    pub category: String,
    /// Format: "YYYY-MM-DD"
    pub date: String,
}

impl Expense {
    pub fn new(title: String, amount: Decimal, category: String, date: String) -> Self {
        Self {
            id: None,
            title,
            amount,
            category,
            date,
        }
    }

    /// The "YYYY-MM" prefix of `date`, or `None` when the date is too short to have one.
    pub fn month(&self) -> Option<&str> {
        self.date.get(..7)
    }

    /// Same row content with a different id; used when comparing stored rows to inputs.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}
