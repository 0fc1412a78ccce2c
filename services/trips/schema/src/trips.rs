use sea_orm::entity::prelude::*;

/// Scheduled trip with a bookable seat counter.
/// (source, destination, date, time) is unique; `available_seats` is never negative.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "trips")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub source: String,
    pub destination: String,
    pub date: Date,
    /// English weekday name derived from `date`.
    pub day: String,
    pub time: String,
    pub available_seats: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub price: Decimal,
    pub currency: String,
    /// One of `active`, `cancelled`, `completed`.
    pub status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
