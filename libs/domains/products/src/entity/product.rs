use sea_orm::entity::prelude::*;
use sea_orm::ActiveValue::{NotSet, Set};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "product")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub is_featured: bool,
    pub expiration_date: Option<DateTimeWithTimeZone>,
    pub items_in_stock: i32,
    pub receipt_date: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Double")]
    pub rating: f64,
    pub brand_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::brand::Entity",
        from = "Column::BrandId",
        to = "super::brand::Column::Id"
    )]
    Brand,
    #[sea_orm(has_many = "super::category_product::Entity")]
    CategoryProduct,
}

impl Related<super::brand::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl Related<super::category_product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CategoryProduct.def()
    }
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        super::category_product::Relation::Category.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::category_product::Relation::Product.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Builds the row for `product` pointing at an already stored brand.
/// `id` is left unset for new products.
pub fn active_model(product: &crate::models::Product, brand_id: i32, insert: bool) -> ActiveModel {
    ActiveModel {
        id: if insert { NotSet } else { Set(product.id) },
        name: Set(product.name.clone()),
        is_featured: Set(product.featured()),
        expiration_date: Set(product.expiration_date.map(Into::into)),
        items_in_stock: Set(product.items_in_stock),
        receipt_date: Set(product.receipt_date.map(Into::into)),
        rating: Set(product.rating()),
        brand_id: Set(brand_id),
    }
}

/// Assembles the domain product from its row and resolved relations
pub fn into_domain(
    model: Model,
    brand: Option<super::brand::Model>,
    categories: Vec<super::category::Model>,
) -> crate::models::Product {
    let mut product = crate::models::Product::new(model.name);
    product.id = model.id;
    product.expiration_date = model.expiration_date.map(Into::into);
    product.items_in_stock = model.items_in_stock;
    product.receipt_date = model.receipt_date.map(Into::into);
    product.brand = brand.map(Into::into);
    product.categories = Some(categories.into_iter().map(Into::into).collect());
    product.with_rating(model.rating).with_featured(model.is_featured)
}
