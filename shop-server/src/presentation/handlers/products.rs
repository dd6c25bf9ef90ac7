use crate::application::catalog_service::CatalogService;
use crate::domain::error::DomainError;
use actix_web::{HttpResponse, Scope, get, web};

pub fn scope() -> Scope {
    web::scope("/products")
        .service(list_products)
        .service(get_product)
}

#[get("")]
async fn list_products(catalog: web::Data<CatalogService>) -> Result<HttpResponse, DomainError> {
    let products = catalog.list_products().await?;
    Ok(HttpResponse::Ok().json(products))
}

#[get("/{id}")]
async fn get_product(
    catalog: web::Data<CatalogService>,
    path: web::Path<String>,
) -> Result<HttpResponse, DomainError> {
    let raw = path.into_inner();
    // Ids that are not numbers cannot exist in the catalog.
    let id = raw
        .parse::<i64>()
        .map_err(|_| DomainError::ProductNotFound(raw.clone()))?;
    let product = catalog.get_product(id).await?;
    Ok(HttpResponse::Ok().json(product))
}
