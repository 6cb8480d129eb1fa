//! HTTP handlers for Products API

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use axum_helpers::{
    errors::responses::{
        BadRequestPathResponse, BadRequestValidationResponse, InternalServerErrorResponse,
        NotFoundResponse,
    },
    PathOperation, PositiveIdPath, ValidateWith, ValidatedJson,
};
use std::sync::Arc;
use utoipa::OpenApi;
use validator::ValidationErrors;

use crate::error::ProductResult;
use crate::models::{Brand, Category, Product};
use crate::repository::ProductRepository;
use crate::service::ProductService;
use crate::validation::{validate_product, Clock, ExpirationDateRule, SystemClock};

/// OpenAPI documentation for Products API
#[derive(OpenApi)]
#[openapi(
    paths(
        list_products,
        get_product_by_id,
        add_product,
        update_product_by_id,
        delete_product_by_id,
    ),
    components(
        schemas(Product, Brand, Category),
        responses(
            NotFoundResponse,
            BadRequestValidationResponse,
            BadRequestPathResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints")
    )
)]
pub struct ApiDoc;

pub struct GetProductById;
pub struct UpdateProductById;
pub struct DeleteProductById;

impl PathOperation for GetProductById {
    const NAME: &'static str = "getProductById";
}

impl PathOperation for UpdateProductById {
    const NAME: &'static str = "updateProductById";
}

impl PathOperation for DeleteProductById {
    const NAME: &'static str = "deleteProductById";
}

/// Router state: the service plus what request validation needs
pub struct ProductState<R: ProductRepository> {
    pub service: Arc<ProductService<R>>,
    pub clock: Arc<dyn Clock>,
    pub expiration: ExpirationDateRule,
}

impl<R: ProductRepository> ProductState<R> {
    /// Wall clock and the default 30-day expiration rule
    pub fn new(service: ProductService<R>) -> Self {
        Self {
            service: Arc::new(service),
            clock: Arc::new(SystemClock),
            expiration: ExpirationDateRule::DEFAULT,
        }
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn with_expiration(mut self, expiration: ExpirationDateRule) -> Self {
        self.expiration = expiration;
        self
    }
}

impl<R: ProductRepository> Clone for ProductState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            clock: Arc::clone(&self.clock),
            expiration: self.expiration,
        }
    }
}

impl<R: ProductRepository> ValidateWith<ProductState<R>> for Product {
    fn validate_with(&self, state: &ProductState<R>) -> Result<(), ValidationErrors> {
        validate_product(self, state.clock.as_ref(), state.expiration)
    }
}

/// Create the products router with all HTTP endpoints
pub fn router<R: ProductRepository + 'static>(service: ProductService<R>) -> Router {
    router_with_state(ProductState::new(service))
}

pub fn router_with_state<R: ProductRepository + 'static>(state: ProductState<R>) -> Router {
    Router::new()
        .route("/all", get(list_products))
        .route("/", axum::routing::post(add_product))
        .route(
            "/{id}",
            get(get_product_by_id)
                .put(update_product_by_id)
                .delete(delete_product_by_id),
        )
        .with_state(state)
}

/// List every product
#[utoipa::path(
    get,
    path = "/all",
    tag = "Products",
    responses(
        (status = 200, description = "All products", body = Vec<Product>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_products<R: ProductRepository>(
    State(state): State<ProductState<R>>,
) -> ProductResult<Json<Vec<Product>>> {
    let products = state.service.list_products().await?;
    Ok(Json(products))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID, must be positive")
    ),
    responses(
        (status = 200, description = "Product found", body = Product),
        (status = 400, response = BadRequestPathResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn get_product_by_id<R: ProductRepository>(
    State(state): State<ProductState<R>>,
    PositiveIdPath(id, _): PositiveIdPath<GetProductById>,
) -> ProductResult<Json<Product>> {
    let product = state.service.get_product(id).await?;
    Ok(Json(product))
}

/// Add a new product
#[utoipa::path(
    post,
    path = "",
    tag = "Products",
    request_body = Product,
    responses(
        (status = 204, description = "Product added"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn add_product<R: ProductRepository>(
    State(state): State<ProductState<R>>,
    ValidatedJson(product): ValidatedJson<Product>,
) -> ProductResult<StatusCode> {
    state.service.add_product(product).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Update an existing product
///
/// Every field except the id is replaced by the request body.
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID, must be positive")
    ),
    request_body = Product,
    responses(
        (status = 204, description = "Product updated"),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn update_product_by_id<R: ProductRepository>(
    State(state): State<ProductState<R>>,
    PositiveIdPath(id, _): PositiveIdPath<UpdateProductById>,
    ValidatedJson(product): ValidatedJson<Product>,
) -> ProductResult<StatusCode> {
    state.service.update_product(id, product).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID, must be positive")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, response = BadRequestPathResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn delete_product_by_id<R: ProductRepository>(
    State(state): State<ProductState<R>>,
    PositiveIdPath(id, _): PositiveIdPath<DeleteProductById>,
) -> ProductResult<StatusCode> {
    state.service.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
