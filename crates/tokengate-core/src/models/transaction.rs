use serde::{Deserialize, Serialize};

/// A transaction as stored by the finance backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub amount: f64,
    pub description: String,
    pub is_income: bool,
    pub date: String,
}

impl Transaction {
    /// Amount with its sign applied: income positive, expenses negative.
    pub fn signed_amount(&self) -> f64 {
        if self.is_income {
            self.amount
        } else {
            -self.amount
        }
    }
}

/// Body of `POST /transactions`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub amount: f64,
    pub description: String,
    pub is_income: bool,
    pub date: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_transaction_list() {
        let json = r#"[
            {"id": 1, "amount": 12.5, "description": "Lunch", "is_income": false, "date": "2024-03-01"},
            {"id": 2, "amount": 2000.0, "description": "Salary", "is_income": true, "date": "2024-03-01"}
        ]"#;
        let list: Vec<Transaction> = serde_json::from_str(json).expect("valid transactions json");
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].description, "Lunch");
        assert_eq!(list[0].signed_amount(), -12.5);
        assert_eq!(list[1].signed_amount(), 2000.0);
    }

    #[test]
    fn test_new_transaction_serializes_without_id() {
        let tx = NewTransaction {
            amount: 5.0,
            description: "Coffee".to_string(),
            is_income: false,
            date: "2024-03-02".to_string(),
        };
        let value = serde_json::to_value(&tx).expect("serializable");
        assert!(value.get("id").is_none());
        assert_eq!(value["description"], "Coffee");
        assert_eq!(value["is_income"], false);
    }
}
