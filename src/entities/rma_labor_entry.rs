use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rma_labor_entries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub rma_id: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub technician: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub hours: Decimal,
    pub labor_date: Option<NaiveDate>,
    #[sea_orm(column_type = "Decimal(Some((8, 2)))")]
    pub price_per_hour: Decimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::rma::Entity",
        from = "Column::RmaId",
        to = "super::rma::Column::Id",
        on_delete = "Cascade"
    )]
    Rma,
}

impl Related<super::rma::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rma.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// hours × price per hour.
    pub fn extended_cost(&self) -> Decimal {
        self.hours * self.price_per_hour
    }
}

/// Sum of the extended cost of every entry.
pub fn total_labor_cost(entries: &[Model]) -> Decimal {
    entries.iter().map(Model::extended_cost).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn entry(hours: Decimal, rate: Decimal) -> Model {
        Model {
            id: 0,
            rma_id: 1,
            description: None,
            technician: None,
            hours,
            labor_date: None,
            price_per_hour: rate,
        }
    }

    #[test]
    fn totals_extended_costs() {
        let entries = vec![entry(dec!(2.5), dec!(120.00)), entry(dec!(1.25), dec!(80.00))];
        assert_eq!(entries[0].extended_cost(), dec!(300.00));
        assert_eq!(total_labor_cost(&entries), dec!(400.00));
        assert_eq!(total_labor_cost(&[]), Decimal::ZERO);
    }
}
