use std::collections::BTreeMap;

use knot_core::errors::{ErrorInfo, KnotError};

use crate::diagram::LinkDiagram;

/// Laurent polynomial in one variable, keyed by exponent.
pub type LaurentPolynomial = BTreeMap<i32, i64>;

/// Evaluates the Kauffman bracket of a diagram.
///
/// Reserved extension point: the recursion over [`resolve_type_a`] and
/// [`resolve_type_b`] and its base case are not defined yet, so every call
/// returns [`KnotError::Unimplemented`].
///
/// [`resolve_type_a`]: crate::resolve_type_a
/// [`resolve_type_b`]: crate::resolve_type_b
pub fn kauffman_bracket(diagram: &LinkDiagram) -> Result<LaurentPolynomial, KnotError> {
    Err(KnotError::Unimplemented(
        ErrorInfo::new(
            "kauffman-bracket",
            "bracket polynomial evaluation is not implemented",
        )
        .with_context("crossings", diagram.crossing_count())
        .with_context("free_loops", diagram.free_loops()),
    ))
}
