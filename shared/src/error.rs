use thiserror::Error;

/// Why a gameplay operation left state untouched.
///
/// None of these are fatal. A rejected operation changes nothing and broadcasts nothing; the
/// variant only exists so callers can log it and tests can assert on it.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Rejection {
    #[error("caller does not hold authority")]
    NoAuthority,

    #[error("resource is not healable")]
    NotHealable,

    #[error("invalid amount {0}")]
    InvalidAmount(f32),

    #[error("value must be positive, got {0}")]
    NonPositive(f32),

    #[error("missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    #[error("not enough stamina")]
    NoStamina,

    #[error("caller is not the locally controlled character")]
    NotLocallyControlled,

    #[error("target is out of reach ({0})")]
    OutOfReach(f32),

    #[error("stale move sequence {received} (last processed {last})")]
    StaleSequence { received: u32, last: u32 },
}

/// Result of a state-changing gameplay operation.
pub type Outcome = Result<(), Rejection>;

/// Failure to decode a wire payload.
#[derive(Error, Debug)]
pub enum WireError {
    #[error("malformed payload: {0}")]
    Malformed(#[from] bincode::Error),
}

/// Rejects negative and non-finite amounts.
///
/// Increase/decrease operations take magnitudes; a negative amount would silently invert the
/// operation, so it is refused instead.
pub fn check_amount(amount: f32) -> Outcome {
    if amount.is_finite() && amount >= 0.0 {
        Ok(())
    } else {
        Err(Rejection::InvalidAmount(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_amount_accepts_zero_and_positive() {
        assert_eq!(check_amount(0.0), Ok(()));
        assert_eq!(check_amount(12.5), Ok(()));
    }

    #[test]
    fn check_amount_rejects_negative_and_nan() {
        assert_eq!(check_amount(-5.0), Err(Rejection::InvalidAmount(-5.0)));
        assert!(check_amount(f32::NAN).is_err());
        assert!(check_amount(f32::INFINITY).is_err());
    }
}
