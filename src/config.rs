use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Rate;
use crate::errors::{DuesError, Result};

/// business constants used by the dues engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuesConfig {
    /// share of the disbursed loan amount retired by each installment
    pub loan_installment_share: Rate,
    /// months after the iteration start before the first loan installment falls due
    pub loan_grace_months: u32,
    /// missed installments forgiven when computing penalties
    pub penalty_grace_installments: u32,
    /// floor on the loan installment count used for interest
    pub minimum_loan_installments: u32,
}

impl Default for DuesConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl DuesConfig {
    /// ten equal loan installments, one month loan grace, one installment penalty grace
    pub fn standard() -> Self {
        Self {
            loan_installment_share: Rate::from_percentage(10),
            loan_grace_months: 1,
            penalty_grace_installments: 1,
            minimum_loan_installments: 1,
        }
    }

    /// load from json; fields left out keep their standard values
    pub fn from_json(json: &str) -> Result<Self> {
        let config: DuesConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let share = self.loan_installment_share.as_decimal();
        if share <= Decimal::ZERO || share > Decimal::ONE {
            return Err(DuesError::InvalidConfiguration {
                message: format!(
                    "loan installment share must be within (0%, 100%], got {}",
                    self.loan_installment_share
                ),
            });
        }
        Ok(())
    }

    /// number of loan installments implied by the installment share
    pub fn loan_installment_count(&self) -> Decimal {
        Decimal::ONE / self.loan_installment_share.as_decimal()
    }
}
