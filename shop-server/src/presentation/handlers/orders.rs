use crate::application::order_service::OrderService;
use crate::domain::error::DomainError;
use crate::domain::user::Identity;
use crate::presentation::dto::{PlaceOrderRequest, PlaceOrderResponse};
use crate::presentation::utils::request_id;
use actix_web::{HttpRequest, HttpResponse, post, web};
use tracing::info;

#[post("")]
pub async fn place_order(
    req: HttpRequest,
    identity: Identity,
    orders: web::Data<OrderService>,
    payload: web::Json<PlaceOrderRequest>,
) -> Result<HttpResponse, DomainError> {
    let lines = payload.into_inner().into_lines()?;
    let placed = orders.place_order(&identity, &lines).await?;
    let order_id = placed.order.id;

    info!(
        request_id = %request_id(&req),
        username = %identity.username,
        order_id,
        items = placed.items.len(),
        "order placed"
    );

    Ok(HttpResponse::Ok().json(PlaceOrderResponse {
        message: "Order placed successfully",
        order_id,
    }))
}
