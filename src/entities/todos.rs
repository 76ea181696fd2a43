use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    /// 24-char hex object id
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub text: String,

    pub completed: bool,

    /// Epoch milliseconds, set only while `completed` is true.
    pub completed_at: Option<i64>,

    pub creator: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
