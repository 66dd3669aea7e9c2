//! Decides which transactions count toward the dashboard statistics.

use crate::transaction::Transaction;

/// Substrings of `transaction_type` that mark a transaction as money movement.
pub const COUNTABLE_TYPE_KEYWORDS: [&str; 4] = ["deposit", "withdraw", "withdrawal", "payout"];

/// The only status that counts as a completed transaction.
pub const SUCCESS_STATUS: &str = "success";

/// Whether `transaction` is a successful deposit, withdrawal or payout.
///
/// Both checks ignore case. The type is matched by substring, so
/// "Bank Withdrawal" counts, while the status must be exactly "success".
pub fn is_countable(transaction: &Transaction) -> bool {
    let transaction_type = transaction.transaction_type.to_lowercase();
    let is_money_movement = COUNTABLE_TYPE_KEYWORDS
        .iter()
        .any(|keyword| transaction_type.contains(keyword));

    is_money_movement && transaction.status.to_lowercase() == SUCCESS_STATUS
}

#[cfg(test)]
mod tests {
    use crate::{classify::is_countable, transaction::Transaction};

    fn transaction(transaction_type: &str, status: &str) -> Transaction {
        Transaction {
            transaction_type: transaction_type.to_owned(),
            status: status.to_owned(),
            created_at: None,
            amount: 0.0,
        }
    }

    #[test]
    fn successful_withdrawal_in_any_case_is_countable() {
        assert!(is_countable(&transaction("Withdrawal", "Success")));
        assert!(is_countable(&transaction("WITHDRAWAL", "SUCCESS")));
    }

    #[test]
    fn every_keyword_is_countable() {
        for transaction_type in ["deposit", "withdraw", "withdrawal", "payout"] {
            assert!(
                is_countable(&transaction(transaction_type, "success")),
                "{transaction_type} should be countable"
            );
        }
    }

    #[test]
    fn keywords_match_as_substrings() {
        assert!(is_countable(&transaction("bank_deposit", "success")));
        assert!(is_countable(&transaction("Freelancer Payout", "success")));
    }

    #[test]
    fn pending_is_never_countable() {
        for transaction_type in ["deposit", "withdrawal", "payout"] {
            assert!(!is_countable(&transaction(transaction_type, "pending")));
        }
    }

    #[test]
    fn status_must_match_exactly() {
        assert!(!is_countable(&transaction("deposit", "successful")));
        assert!(!is_countable(&transaction("deposit", " success")));
        assert!(!is_countable(&transaction("deposit", "")));
    }

    #[test]
    fn other_types_are_not_countable() {
        assert!(!is_countable(&transaction("refund", "success")));
        assert!(!is_countable(&transaction("", "success")));
    }
}
