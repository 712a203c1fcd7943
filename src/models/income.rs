use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Income {
    pub id: Option<i64>,
    /// Format: "YYYY-MM"
    pub month: String,
    pub amount: Decimal,
}

impl Income {
    pub fn new(month: String, amount: Decimal) -> Self {
        Self {
            id: None,
            month,
            amount,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }
}
