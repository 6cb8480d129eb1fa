use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "brand")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub country: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product::Entity")]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Brand {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            country: model.country,
        }
    }
}

/// Leaves `id` unset so the database assigns it
pub fn new_active_model(brand: &crate::models::Brand) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        name: Set(brand.name.clone()),
        country: Set(brand.country.clone()),
    }
}
