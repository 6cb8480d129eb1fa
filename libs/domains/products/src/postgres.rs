use async_trait::async_trait;
use std::collections::BTreeMap;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, TransactionTrait,
};

use crate::entity::{brand, category, category_product, product};
use crate::error::{ProductError, ProductResult};
use crate::models::{Brand, Category, Product};
use crate::repository::ProductRepository;

/// PostgreSQL repository over the `product`, `brand`, `category` and
/// `category_product` tables.
///
/// A save runs in one transaction: brand and categories are upserted first,
/// then the product row, then its category links are replaced.
#[derive(Clone)]
pub struct PgProductRepository {
    db: DatabaseConnection,
}

impl PgProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load<C: ConnectionTrait>(db: &C, model: product::Model) -> ProductResult<Product> {
        let brand = brand::Entity::find_by_id(model.brand_id).one(db).await?;
        let categories = model
            .find_related(category::Entity)
            .order_by_asc(category::Column::Id)
            .all(db)
            .await?;

        Ok(product::into_domain(model, brand, categories))
    }
}

async fn save_brand<C: ConnectionTrait>(db: &C, brand: &Brand) -> ProductResult<brand::Model> {
    let existing = if brand.id > 0 {
        brand::Entity::find_by_id(brand.id).one(db).await?
    } else {
        None
    };

    let model = match existing {
        Some(existing) => {
            let mut active: brand::ActiveModel = existing.into();
            active.name = Set(brand.name.clone());
            active.country = Set(brand.country.clone());
            active.update(db).await?
        }
        None => brand::new_active_model(brand).insert(db).await?,
    };

    Ok(model)
}

async fn save_category<C: ConnectionTrait>(
    db: &C,
    category: &Category,
) -> ProductResult<category::Model> {
    let existing = if category.id > 0 {
        category::Entity::find_by_id(category.id).one(db).await?
    } else {
        None
    };

    let model = match existing {
        Some(existing) => {
            let mut active: category::ActiveModel = existing.into();
            active.name = Set(category.name.clone());
            active.update(db).await?
        }
        None => category::new_active_model(category).insert(db).await?,
    };

    Ok(model)
}

#[async_trait]
impl ProductRepository for PgProductRepository {
    async fn find_all(&self) -> ProductResult<Vec<Product>> {
        let models = product::Entity::find()
            .order_by_asc(product::Column::Id)
            .all(&self.db)
            .await?;

        let mut products = Vec::with_capacity(models.len());
        for model in models {
            products.push(Self::load(&self.db, model).await?);
        }
        Ok(products)
    }

    async fn find_by_id(&self, id: i32) -> ProductResult<Option<Product>> {
        match product::Entity::find_by_id(id).one(&self.db).await? {
            Some(model) => Ok(Some(Self::load(&self.db, model).await?)),
            None => Ok(None),
        }
    }

    async fn save(&self, product: Product) -> ProductResult<Product> {
        let Some(brand) = product.brand.as_ref() else {
            return Err(ProductError::Internal(
                "Cannot save a product without a brand".to_string(),
            ));
        };

        let txn = self.db.begin().await?;

        let brand = save_brand(&txn, brand).await?;

        // One link per category id; a later entry with the same id wins
        let mut categories = BTreeMap::new();
        for category in product.categories.iter().flatten() {
            let saved = save_category(&txn, category).await?;
            categories.insert(saved.id, saved);
        }

        let exists = product.id > 0
            && product::Entity::find_by_id(product.id)
                .one(&txn)
                .await?
                .is_some();

        let model = if exists {
            category_product::Entity::delete_many()
                .filter(category_product::Column::ProductId.eq(product.id))
                .exec(&txn)
                .await?;
            product::active_model(&product, brand.id, false)
                .update(&txn)
                .await?
        } else {
            product::active_model(&product, brand.id, true)
                .insert(&txn)
                .await?
        };

        for category in categories.values() {
            category_product::ActiveModel {
                product_id: Set(model.id),
                category_id: Set(category.id),
            }
            .insert(&txn)
            .await?;
        }

        let saved = Self::load(&txn, model).await?;
        txn.commit().await?;

        if exists {
            tracing::info!(product_id = %saved.id, "Updated product");
        } else {
            tracing::info!(product_id = %saved.id, "Created product");
        }
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i32) -> ProductResult<()> {
        let result = product::Entity::delete_by_id(id).exec(&self.db).await?;

        if result.rows_affected == 0 {
            return Err(ProductError::NotFound(id));
        }

        tracing::info!(product_id = %id, "Deleted product");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn product_row(id: i32) -> product::Model {
        product::Model {
            id,
            name: "Rake".to_string(),
            is_featured: false,
            expiration_date: None,
            items_in_stock: 3,
            receipt_date: None,
            rating: 9.5,
            brand_id: 2,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_resolves_relations() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![product_row(1)]])
            .append_query_results([vec![brand::Model {
                id: 2,
                name: "Acme".to_string(),
                country: Some("SE".to_string()),
            }]])
            .append_query_results([vec![category::Model {
                id: 5,
                name: "Garden".to_string(),
            }]])
            .into_connection();

        let repo = PgProductRepository::new(db);
        let product = repo.find_by_id(1).await.unwrap().unwrap();

        assert_eq!(product.id, 1);
        assert!(product.featured());
        assert_eq!(product.brand.unwrap().name, "Acme");
        assert_eq!(
            product.categories.unwrap().into_iter().next().map(|c| c.id),
            Some(5)
        );
    }

    #[tokio::test]
    async fn test_find_by_id_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<product::Model>::new()])
            .into_connection();

        let repo = PgProductRepository::new(db);
        assert!(repo.find_by_id(9).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PgProductRepository::new(db);
        let result = repo.delete_by_id(3).await;
        assert!(matches!(result, Err(ProductError::NotFound(3))));
    }

    #[tokio::test]
    async fn test_save_without_brand_is_rejected() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = PgProductRepository::new(db);

        let result = repo.save(Product::new("Rake")).await;
        assert!(matches!(result, Err(ProductError::Internal(_))));
    }
}
