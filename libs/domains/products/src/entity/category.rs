use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::category_product::Entity")]
    CategoryProduct,
}

impl Related<super::category_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CategoryProduct.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        super::category_product::Relation::Product.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::category_product::Relation::Category.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::models::Category {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

/// Leaves `id` unset so the database assigns it
pub fn new_active_model(category: &crate::models::Category) -> ActiveModel {
    ActiveModel {
        id: NotSet,
        name: Set(category.name.clone()),
    }
}
