use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub use migration::{DEFAULT_USER_EMAIL, DEFAULT_USER_ID};

use crate::entry;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Entry,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Entry => Entity::has_many(entry::Entity).into() }
    }
}

impl Related<entry::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entry.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
