use sea_orm::{
    sea_query::Expr, ColumnTrait, Condition, ConnectionTrait, DbBackend, EntityTrait,
    QueryFilter, Statement,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    db::DbPool,
    entities::tool::{self, ToolStatus, ToolType},
    errors::ServiceError,
};

/// Stored tool statuses from before the checklist-driven status, and what they mean now.
pub const LEGACY_STATUS_MAP: [(&str, ToolStatus); 5] = [
    ("IN_USE", ToolStatus::InProgress),
    ("MAINTENANCE", ToolStatus::InProgress),
    ("DAMAGED", ToolStatus::Completed),
    ("LOST", ToolStatus::Completed),
    ("AVAILABLE", ToolStatus::NotStarted),
];

const WIDEN_PASSDOWN_COMMENT: &str =
    "ALTER TABLE passdowns ALTER COLUMN comment TYPE VARCHAR(10000)";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PatchReport {
    /// Rows rewritten from a known legacy status
    pub legacy_statuses_mapped: u64,
    /// Rows whose status was unknown or NULL and fell back to NOT_STARTED
    pub unknown_statuses_reset: u64,
    pub tool_types_reset: u64,
    pub passdown_comment_widened: bool,
}

impl PatchReport {
    pub fn changed_rows(&self) -> u64 {
        self.legacy_statuses_mapped + self.unknown_statuses_reset + self.tool_types_reset
    }
}

/// Repairs stored values the current enums cannot decode. Running it again changes nothing.
#[instrument(skip(db))]
pub async fn apply(db: &DbPool) -> Result<PatchReport, ServiceError> {
    let mut report = PatchReport::default();

    for (legacy, status) in LEGACY_STATUS_MAP {
        let result = tool::Entity::update_many()
            .col_expr(tool::Column::Status, Expr::value(stored(status)))
            .filter(tool::Column::Status.eq(legacy))
            .exec(db)
            .await?;
        if result.rows_affected > 0 {
            info!(legacy, mapped_to = stored(status), rows = result.rows_affected, "legacy tool status mapped");
        }
        report.legacy_statuses_mapped += result.rows_affected;
    }

    let result = tool::Entity::update_many()
        .col_expr(tool::Column::Status, Expr::value(stored(ToolStatus::NotStarted)))
        .filter(
            Condition::any()
                .add(tool::Column::Status.is_null())
                .add(tool::Column::Status.is_not_in(ToolStatus::STORED_NAMES)),
        )
        .exec(db)
        .await?;
    report.unknown_statuses_reset = result.rows_affected;

    let result = tool::Entity::update_many()
        .col_expr(tool::Column::ToolType, Expr::value(stored_type(ToolType::Slurry)))
        .filter(
            Condition::all()
                .add(tool::Column::ToolType.is_not_null())
                .add(tool::Column::ToolType.is_not_in(ToolType::STORED_NAMES)),
        )
        .exec(db)
        .await?;
    report.tool_types_reset = result.rows_affected;

    if db.get_database_backend() == DbBackend::Postgres {
        match db
            .execute(Statement::from_string(
                DbBackend::Postgres,
                WIDEN_PASSDOWN_COMMENT.to_string(),
            ))
            .await
        {
            Ok(_) => report.passdown_comment_widened = true,
            Err(err) => warn!(error = %err, "could not widen passdowns.comment"),
        }
    }

    info!(
        changed_rows = report.changed_rows(),
        passdown_comment_widened = report.passdown_comment_widened,
        "schema patch finished"
    );
    Ok(report)
}

fn stored(status: ToolStatus) -> &'static str {
    match status {
        ToolStatus::NotStarted => "NOT_STARTED",
        ToolStatus::InProgress => "IN_PROGRESS",
        ToolStatus::Completed => "COMPLETED",
    }
}

fn stored_type(tool_type: ToolType) -> &'static str {
    match tool_type {
        ToolType::Chemblend => "CHEMBLEND",
        ToolType::Slurry => "SLURRY",
        ToolType::Amatgasguard => "AMATGASGUARD",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_names_are_never_valid_statuses() {
        for (legacy, _) in LEGACY_STATUS_MAP {
            assert!(!ToolStatus::STORED_NAMES.contains(&legacy));
        }
    }

    #[test]
    fn stored_names_match_the_enum_tables() {
        for status in [ToolStatus::NotStarted, ToolStatus::InProgress, ToolStatus::Completed] {
            assert!(ToolStatus::STORED_NAMES.contains(&stored(status)));
        }
        for tool_type in [ToolType::Chemblend, ToolType::Slurry, ToolType::Amatgasguard] {
            assert!(ToolType::STORED_NAMES.contains(&stored_type(tool_type)));
        }
    }
}
