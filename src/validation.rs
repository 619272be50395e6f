use thiserror::Error;

use crate::form::FormState;

/// First failing check of the edit-trip form, in check order
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter Trip Name")]
    MissingName,

    #[error("Please enter Trip Destination")]
    MissingDestination,

    #[error("Please select Trip Start Date")]
    MissingStartDate,

    #[error("Please select Trip End Date")]
    MissingEndDate,

    #[error("Please enter Trip Funds")]
    MissingFunds,
}

/// Run the checks in fixed order and stop at the first failure
pub fn validate(form: &FormState) -> Result<(), ValidationError> {
    if form.name.is_empty() {
        return Err(ValidationError::MissingName);
    }
    if form.destinations.iter().any(|d| d.trim().is_empty()) {
        return Err(ValidationError::MissingDestination);
    }
    if form.start_date.is_empty() {
        return Err(ValidationError::MissingStartDate);
    }
    if form.end_date.is_empty() {
        return Err(ValidationError::MissingEndDate);
    }
    if form.fund_goal.is_empty() {
        return Err(ValidationError::MissingFunds);
    }
    Ok(())
}
