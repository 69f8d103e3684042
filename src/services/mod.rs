//! Business services. Each service owns the repositories it needs and is cheap to clone.

pub mod checklist_templates;
pub mod locations;
pub mod moving_parts;
pub mod parts;
pub mod passdowns;
pub mod records;
pub mod return_addresses;
pub mod rmas;
pub mod tools;
pub mod track_trends;
pub mod users;

use crate::errors::ServiceError;
use std::collections::HashSet;

/// Fails with `InvalidInput` naming the first requested id that was not found.
pub(crate) fn ensure_all_found<I>(entity: &str, requested: &[i32], found: I) -> Result<(), ServiceError>
where
    I: IntoIterator<Item = i32>,
{
    let found: HashSet<i32> = found.into_iter().collect();
    match requested.iter().find(|id| !found.contains(id)) {
        Some(missing) => Err(ServiceError::InvalidInput(format!(
            "{} with ID {} does not exist",
            entity, missing
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn reports_first_missing_id() {
        assert!(ensure_all_found("Tool", &[1, 2], [2, 1]).is_ok());
        assert_matches!(
            ensure_all_found("Tool", &[1, 7, 9], [1]),
            Err(ServiceError::InvalidInput(message)) if message == "Tool with ID 7 does not exist"
        );
    }
}
