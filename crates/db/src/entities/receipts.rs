//! `SeaORM` Entity for receipts table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::DocumentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "receipts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub document_number: String,
    pub transaction_id: Uuid,
    pub invoice_id: Uuid,
    pub quotation_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((19, 2)))")]
    pub amount: Decimal,
    pub status: DocumentStatus,
    pub issued_at: DateTimeWithTimeZone,
    pub cancelled_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::customer_transactions::Entity",
        from = "Column::TransactionId",
        to = "super::customer_transactions::Column::Id"
    )]
    CustomerTransactions,
}

impl Related<super::customer_transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerTransactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
