/// Failures of the vector math and of the process built on it.
///
/// All of these point at bad input coordinates rather than a runtime
/// condition, so callers propagate them instead of recovering.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum DomainError {
    #[error("cannot normalize a zero-length vector")]
    ZeroVector,

    #[error("vectors are parallel, they span no unique plane")]
    ParallelVectors,

    #[error("base vector v{} lies in the span of the previous ones", .index + 1)]
    LinearlyDependent { index: usize },

    #[error("{count} base vectors cannot be independent in {dim} dimensions")]
    TooManyVectors { count: usize, dim: usize },
}
