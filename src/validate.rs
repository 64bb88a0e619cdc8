use thiserror::Error;

/// Smallest value a cart `count` must exceed.
pub const MIN_COUNT: i64 = 0;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field} is required")]
    Empty { field: &'static str },

    #[error("{field} must be greater than {min}")]
    NotGreaterThan { field: &'static str, min: i64 },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Empty { field } | ValidationError::NotGreaterThan { field, .. } => {
                *field
            }
        }
    }
}

/// Runs checks in order and keeps only the first failure.
#[derive(Debug, Default)]
pub struct Validator {
    err: Option<ValidationError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn not_empty(self, field: &'static str, value: i64) -> Self {
        self.check(value != 0, || ValidationError::Empty { field })
    }

    pub fn greater_than(self, field: &'static str, value: i64, min: i64) -> Self {
        self.check(value > min, || ValidationError::NotGreaterThan { field, min })
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        match self.err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn check(mut self, ok: bool, err: impl FnOnce() -> ValidationError) -> Self {
        if self.err.is_none() && !ok {
            self.err = Some(err());
        }
        self
    }
}
