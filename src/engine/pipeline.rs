// Calculation pipeline - evaluate, guard, record

use crate::core::errors::AbacusError;
use crate::core::models::{Calculation, CalculationRecord};
use crate::state::history::HistoryStore;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Executes calculations and records the successful ones
///
/// Pure computation plus exactly one side effect: a history append on
/// success. Failed calculations append nothing; there are no retries
/// and no partial completion.
pub struct CalculationPipeline {
    history: Arc<dyn HistoryStore + Send + Sync>,
}

impl CalculationPipeline {
    /// Create a pipeline writing to the given history store
    pub fn new(history: Arc<dyn HistoryStore + Send + Sync>) -> Self {
        Self { history }
    }

    /// Evaluate a calculation, append a record on success, and return it
    pub async fn execute(
        &self,
        calculation: Calculation,
    ) -> Result<CalculationRecord, AbacusError> {
        let operation = calculation.operation();

        let result = match calculation.evaluate() {
            Ok(result) => result,
            Err(e) => {
                warn!(operation = %operation, error = %e, "Calculation refused");
                return Err(e);
            }
        };

        // A result outside the finite range cannot be represented in a
        // JSON response; the client sees a generic internal error while
        // the causing calculation is logged here.
        if !result.is_finite() {
            error!(
                operation = %operation,
                calculation = ?calculation,
                "Calculation produced a non-finite result"
            );
            return Err(AbacusError::Computation(format!(
                "{} produced a non-finite result",
                operation
            )));
        }

        let record = CalculationRecord::new(operation, result);
        self.history.append(record.clone()).await?;

        info!(operation = %operation, result, "Calculation completed");

        Ok(record)
    }
}
