use axum::{
    Json,
    extract::Extension,
    response::{IntoResponse, Response},
};

use crate::app::routes::with_manager;
use crate::app::{SharedManager, dto};

pub async fn inventory(Extension(manager): Extension<SharedManager>) -> Response {
    match with_manager(&manager, |m| m.inventory_snapshot().iter().map(dto::inventory_item).collect::<Vec<_>>()) {
        Ok(items) => Json(items).into_response(),
        Err(response) => response,
    }
}

pub async fn orders(Extension(manager): Extension<SharedManager>) -> Response {
    match with_manager(&manager, |m| m.purchase_log().iter().map(dto::order_record).collect::<Vec<_>>()) {
        Ok(orders) => Json(orders).into_response(),
        Err(response) => response,
    }
}

pub async fn customers(Extension(manager): Extension<SharedManager>) -> Response {
    match with_manager(&manager, |m| m.customer_purchase_summary()) {
        Ok(customers) => Json(customers).into_response(),
        Err(response) => response,
    }
}

pub async fn restocks(Extension(manager): Extension<SharedManager>) -> Response {
    match with_manager(&manager, |m| m.restock_log().iter().map(dto::restock_line).collect::<Vec<_>>()) {
        Ok(restocks) => Json(restocks).into_response(),
        Err(response) => response,
    }
}
