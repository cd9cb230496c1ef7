use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    /// A caller-supplied value the kernel refuses to compute with. Nothing is
    /// computed or cached when this is returned.
    #[error("invalid input for `{field}`: {reason}")]
    InvalidInput { field: &'static str, reason: String },
}

impl KernelError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        KernelError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            KernelError::InvalidInput { field, .. } => field,
        }
    }
}

pub type Result<T> = std::result::Result<T, KernelError>;

/// Rejects NaN, infinities and negatives.
pub fn ensure_non_negative(field: &'static str, value: f64) -> Result<f64> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        return Err(KernelError::invalid(field, format!("{value} is negative")));
    }
    Ok(value)
}

pub fn ensure_finite(field: &'static str, value: f64) -> Result<f64> {
    if value.is_nan() {
        return Err(KernelError::invalid(field, "value is NaN"));
    }
    if value.is_infinite() {
        return Err(KernelError::invalid(field, "value is infinite"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_negative_guard_rejects_bad_values() {
        assert!(ensure_non_negative("x", 0.0).is_ok());
        assert!(ensure_non_negative("x", 2.5).is_ok());
        assert_eq!(ensure_non_negative("x", -1.0).unwrap_err().field(), "x");
        assert!(ensure_non_negative("x", f64::NAN).is_err());
        assert!(ensure_non_negative("x", f64::INFINITY).is_err());
    }

    #[test]
    fn finite_guard_allows_negatives() {
        assert_eq!(ensure_finite("momentum", -0.3).unwrap(), -0.3);
        assert!(ensure_finite("momentum", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn message_names_the_field() {
        let err = KernelError::invalid("home_attack", "-1 is negative");
        assert_eq!(
            err.to_string(),
            "invalid input for `home_attack`: -1 is negative"
        );
    }
}
