//! Record shape compatibility.

use crate::error::{ConstructionError, ConstructionResult};
use crate::record::Record;

/// Checks that `Candidate` declares every field of `Required`.
///
/// Each field of `Required` must exist on `Candidate` under the same
/// identifier, with the same type and the same wire annotation, modifiers
/// included. `Candidate` may declare more fields.
///
/// # Errors
///
/// Returns the first missing or mismatched field, naming `Candidate`.
///
/// # Example
///
/// ```rust
/// use waymark_core::{check_is_subset, Record};
///
/// #[derive(Default, Record)]
/// struct UserParams {
///     #[wire("user_id")]
///     user_id: i64,
/// }
///
/// #[derive(Default, Record)]
/// struct UserRequest {
///     #[wire("user_id")]
///     user_id: i64,
///     #[wire("search")]
///     search: String,
/// }
///
/// assert!(check_is_subset::<UserRequest, UserParams>().is_ok());
/// assert!(check_is_subset::<UserParams, UserRequest>().is_err());
/// ```
pub fn check_is_subset<Candidate: Record, Required: Record>() -> ConstructionResult<()> {
    let record = Candidate::type_name();
    let candidates = Candidate::fields();

    for required in Required::fields() {
        let field = required.ident;
        let found = candidates
            .iter()
            .find(|c| c.ident == field)
            .ok_or(ConstructionError::MissingField { field, record })?;

        if !found.same_type(required) {
            return Err(ConstructionError::TypeMismatch { field, record });
        }
        if found.wire != required.wire {
            return Err(ConstructionError::WireMismatch { field, record });
        }
    }

    Ok(())
}
