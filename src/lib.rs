//! Gram-Schmidt orthogonalization, step by step.
//!
//! [`library`] holds the vector arithmetic and [`elbow`] the right-angle
//! bracket drawn between a projection and its residual. [`gram_schmidt`]
//! walks the process over a basis, and [`scene`] scripts the walk onto a
//! [`timeline`] that the `gsviz` viewer plays back.

pub mod elbow;
pub mod error;
pub mod gram_schmidt;
pub mod library;
pub mod scene;
pub mod timeline;

pub use error::DomainError;
