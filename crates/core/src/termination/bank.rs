//! Validation of refund bank details.

use crate::termination::error::TerminationError;
use crate::termination::types::BankDetails;

const ACCOUNT_NUMBER_MIN_DIGITS: usize = 6;
const ACCOUNT_NUMBER_MAX_DIGITS: usize = 34;

impl BankDetails {
    /// Validates the details and returns a normalized copy.
    ///
    /// Names are trimmed. Spaces and dashes are stripped from the account
    /// number, which must then be 6 to 34 digits.
    ///
    /// # Errors
    ///
    /// Returns `TerminationError::Validation` naming the offending field.
    pub fn normalized(&self) -> Result<Self, TerminationError> {
        let bank_name = required("bank_name", &self.bank_name)?;
        let account_name = required("account_name", &self.account_name)?;

        let account_number: String = self
            .account_number
            .chars()
            .filter(|c| !matches!(c, ' ' | '-'))
            .collect();

        if account_number.is_empty() {
            return Err(TerminationError::Validation(
                "account_number is required".to_string(),
            ));
        }
        if !account_number.chars().all(|c| c.is_ascii_digit())
            || !(ACCOUNT_NUMBER_MIN_DIGITS..=ACCOUNT_NUMBER_MAX_DIGITS)
                .contains(&account_number.len())
        {
            return Err(TerminationError::Validation(format!(
                "account_number must be {ACCOUNT_NUMBER_MIN_DIGITS} to {ACCOUNT_NUMBER_MAX_DIGITS} digits"
            )));
        }

        Ok(Self {
            bank_name,
            account_name,
            account_number,
        })
    }
}

fn required(field: &str, value: &str) -> Result<String, TerminationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(TerminationError::Validation(format!("{field} is required")))
    } else {
        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn details(account_number: &str) -> BankDetails {
        BankDetails {
            bank_name: " Commercial Bank ".to_string(),
            account_name: "Abebe Kebede".to_string(),
            account_number: account_number.to_string(),
        }
    }

    #[test]
    fn test_normalizes_fields() {
        let normalized = details("1000-2345 6789").normalized().unwrap();
        assert_eq!(normalized.bank_name, "Commercial Bank");
        assert_eq!(normalized.account_number, "100023456789");
    }

    #[test]
    fn test_rejects_blank_bank_name() {
        let mut d = details("100023456789");
        d.bank_name = "   ".to_string();
        let err = d.normalized().unwrap_err();
        assert_eq!(err.to_string(), "bank_name is required");
    }

    #[test]
    fn test_rejects_non_digit_account_number() {
        assert!(matches!(
            details("12AB5678").normalized(),
            Err(TerminationError::Validation(_))
        ));
    }

    #[test]
    fn test_rejects_short_account_number() {
        assert!(details("12345").normalized().is_err());
        assert!(details("123456").normalized().is_ok());
    }
}
