use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, PaginatorTrait, Select,
};
use std::sync::Arc;

pub mod location_repository;
pub mod moving_part_repository;
pub mod owned_record_repository;
pub mod part_repository;
pub mod passdown_repository;
pub mod rma_repository;
pub mod settings_repository;
pub mod tool_repository;
pub mod track_trend_repository;
pub mod user_repository;

pub use location_repository::{CustomLocationRepository, LocationRepository};
pub use moving_part_repository::MovingPartRepository;
pub use owned_record_repository::OwnedRecordRepository;
pub use part_repository::PartRepository;
pub use passdown_repository::PassdownRepository;
pub use rma_repository::RmaRepository;
pub use settings_repository::{ChecklistTemplateRepository, ReturnAddressRepository};
pub use tool_repository::ToolRepository;
pub use track_trend_repository::TrackTrendRepository;
pub use user_repository::UserRepository;

/// Repository trait for common database operations
pub trait Repository {
    fn get_db(&self) -> &DatabaseConnection;
}

#[derive(Debug, Clone)]
pub struct BaseRepository {
    db: Arc<DatabaseConnection>,
}

impl BaseRepository {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl Repository for BaseRepository {
    fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Runs `select` through a paginator and returns one 1-based page plus the total row count.
pub async fn fetch_page<E>(
    db: &DatabaseConnection,
    select: Select<E>,
    page: u64,
    page_size: u64,
) -> Result<(Vec<E::Model>, u64), DbErr>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync,
{
    let paginator = select.paginate(db, page_size.max(1));
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(page.saturating_sub(1)).await?;
    Ok((items, total))
}

/// Wraps a search term for a case-insensitive LIKE, or `None` when blank.
pub fn like_pattern(term: Option<&str>) -> Option<String> {
    term.map(str::trim)
        .filter(|term| !term.is_empty())
        .map(|term| format!("%{}%", term.to_lowercase()))
}

/// `LOWER(column) LIKE pattern`, portable across SQLite and PostgreSQL.
pub fn lower_like<C: ColumnTrait>(column: C, pattern: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col(column))).like(pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_skips_blank_terms() {
        assert_eq!(like_pattern(None), None);
        assert_eq!(like_pattern(Some("  ")), None);
        assert_eq!(like_pattern(Some(" RR151 ")).as_deref(), Some("%rr151%"));
    }
}
