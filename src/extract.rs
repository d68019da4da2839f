//! Field-path extraction seam.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Error from a field accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExtractError {
    /// The message has no field at the path.
    #[error("no field at path")]
    MissingField,
    /// The field exists but is not a scalar.
    #[error("field is not a scalar")]
    NotScalar,
}

/// Scalar accessor resolved for one dotted field path.
pub type FieldAccessor<M> = Arc<dyn Fn(&M) -> Result<f64, ExtractError> + Send + Sync>;

/// A dotted field path paired with its resolved accessor.
///
/// The host's extractor resolves the path once and hands over a closure;
/// the loader then applies it to every record instead of re-resolving the
/// path by name each time.
#[derive(Clone)]
pub struct FieldPath<M> {
    name: String,
    accessor: FieldAccessor<M>,
}

impl<M> FieldPath<M> {
    /// Pair a path name with its accessor.
    pub fn new(
        name: impl Into<String>,
        accessor: impl Fn(&M) -> Result<f64, ExtractError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            accessor: Arc::new(accessor),
        }
    }

    /// The dotted path name, also the series name the values feed.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extract the scalar from a message.
    pub fn extract(&self, message: &M) -> Result<f64, ExtractError> {
        (self.accessor)(message)
    }
}

impl<M> fmt::Debug for FieldPath<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldPath({:?})", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessor_runs_against_messages() {
        let path = FieldPath::new("pose.x", |message: &(f64, f64)| Ok(message.0));
        assert_eq!(path.extract(&(1.5, 2.5)), Ok(1.5));
        assert_eq!(path.name(), "pose.x");
    }

    #[test]
    fn failures_carry_the_reason() {
        let path = FieldPath::new("missing", |_: &()| Err(ExtractError::MissingField));
        assert_eq!(path.extract(&()), Err(ExtractError::MissingField));
    }
}
