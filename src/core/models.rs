// Domain models for calculations, requests, and history records

use crate::core::constants::bounds::OPERAND_LIMIT;
use crate::core::errors::AbacusError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Operation label attached to every history record and response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Power,
    SquareRoot,
}

impl Operation {
    /// Get the wire label for this operation
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Addition => "addition",
            Operation::Subtraction => "subtraction",
            Operation::Multiplication => "multiplication",
            Operation::Division => "division",
            Operation::Power => "power",
            Operation::SquareRoot => "square_root",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A calculation to perform, pairing an operation with its operands
///
/// Each variant carries exactly the operands its operation needs, so an
/// arity mismatch is unrepresentable. Domain guards live on the variant
/// that owns them: `Divide` rejects a zero divisor, `Sqrt` rejects a
/// negative radicand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Calculation {
    Add { a: f64, b: f64 },
    Subtract { a: f64, b: f64 },
    Multiply { a: f64, b: f64 },
    Divide { a: f64, b: f64 },
    Power { a: f64, b: f64 },
    Sqrt { a: f64 },
}

impl Calculation {
    /// Get the operation label for this calculation
    pub fn operation(&self) -> Operation {
        match self {
            Calculation::Add { .. } => Operation::Addition,
            Calculation::Subtract { .. } => Operation::Subtraction,
            Calculation::Multiply { .. } => Operation::Multiplication,
            Calculation::Divide { .. } => Operation::Division,
            Calculation::Power { .. } => Operation::Power,
            Calculation::Sqrt { .. } => Operation::SquareRoot,
        }
    }

    /// Evaluate the calculation, applying the variant's domain guard
    ///
    /// Returns the raw IEEE-754 result. Zero is a valid radicand for
    /// `Sqrt`. `Power` has no input guard; results that leave the finite
    /// range are caught downstream at the pipeline boundary.
    pub fn evaluate(&self) -> Result<f64, AbacusError> {
        match *self {
            Calculation::Add { a, b } => Ok(a + b),
            Calculation::Subtract { a, b } => Ok(a - b),
            Calculation::Multiply { a, b } => Ok(a * b),
            Calculation::Divide { a, b } => {
                if b == 0.0 {
                    return Err(AbacusError::DivisionByZero);
                }
                Ok(a / b)
            }
            Calculation::Power { a, b } => Ok(a.powf(b)),
            Calculation::Sqrt { a } => {
                if a < 0.0 {
                    return Err(AbacusError::NegativeRadicand);
                }
                Ok(a.sqrt())
            }
        }
    }
}

/// A completed calculation as stored in history and returned to clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRecord {
    pub operation: Operation,
    pub result: f64,
    pub timestamp: DateTime<Utc>,
}

impl CalculationRecord {
    /// Create a record stamped with the current time
    pub fn new(operation: Operation, result: f64) -> Self {
        Self {
            operation,
            result,
            timestamp: Utc::now(),
        }
    }
}

/// Verified identity embedded in a bearer token
///
/// Set as a request extension by the auth middleware. Beyond logging,
/// nothing inspects it; its presence is the proof of authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject(String);

impl Subject {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Login request body (form-encoded)
///
/// No Debug derive: the raw password must never reach a log line.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for two-operand endpoints
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct CalculationRequest {
    pub number1: f64,
    pub number2: f64,
}

impl CalculationRequest {
    /// Check both operands against the admissible range
    pub fn validate(&self) -> Result<(), AbacusError> {
        validate_operand("number1", self.number1)?;
        validate_operand("number2", self.number2)?;
        Ok(())
    }
}

/// Request body for the square-root endpoint
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SquareRootRequest {
    pub number1: f64,
}

impl SquareRootRequest {
    /// Check the operand against the admissible range
    pub fn validate(&self) -> Result<(), AbacusError> {
        validate_operand("number1", self.number1)
    }
}

/// Reject operands outside the open interval (-OPERAND_LIMIT, OPERAND_LIMIT)
///
/// NaN fails both comparisons and is rejected with the same message.
fn validate_operand(name: &str, value: f64) -> Result<(), AbacusError> {
    if value > -OPERAND_LIMIT && value < OPERAND_LIMIT {
        Ok(())
    } else {
        Err(AbacusError::Validation(format!(
            "{} must be strictly between -{} and {}",
            name, OPERAND_LIMIT, OPERAND_LIMIT
        )))
    }
}
