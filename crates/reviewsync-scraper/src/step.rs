use crate::error::RenderError;

/// Outcome of one renderer-backed step.
///
/// `Absent` is a normal result (the page simply has no such element);
/// `Failed` means the renderer itself errored. Callers decide whether either
/// one is worth continuing past.
#[derive(Debug)]
pub enum Step<T> {
    Found(T),
    Absent,
    Failed(RenderError),
}

impl<T> Step<T> {
    #[must_use]
    pub fn found(self) -> Option<T> {
        match self {
            Step::Found(value) => Some(value),
            Step::Absent | Step::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn is_found(&self) -> bool {
        matches!(self, Step::Found(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Step<U> {
        match self {
            Step::Found(value) => Step::Found(f(value)),
            Step::Absent => Step::Absent,
            Step::Failed(err) => Step::Failed(err),
        }
    }

    /// `Absent` becomes `Ok(None)`; only `Failed` is an error.
    ///
    /// # Errors
    ///
    /// Returns the wrapped [`RenderError`] for `Step::Failed`.
    pub fn into_result(self) -> Result<Option<T>, RenderError> {
        match self {
            Step::Found(value) => Ok(Some(value)),
            Step::Absent => Ok(None),
            Step::Failed(err) => Err(err),
        }
    }
}

impl<T> From<Result<T, RenderError>> for Step<T> {
    fn from(result: Result<T, RenderError>) -> Self {
        match result {
            Ok(value) => Step::Found(value),
            Err(err) => Step::Failed(err),
        }
    }
}
