use axum::response::Html;
use serde::Serialize;

use crate::server::views;

#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub name: &'static str,
    pub description: &'static str,
}

pub const CATALOGUE: [Product; 3] = [
    Product {
        name: "Product1",
        description: "Description1",
    },
    Product {
        name: "Product2",
        description: "Description2",
    },
    Product {
        name: "Product3",
        description: "Description3",
    },
];

/// Landing page
pub async fn index() -> Html<String> {
    Html(views::index_page())
}

pub async fn request_services() -> Html<String> {
    Html(views::request_services_page())
}

/// Products or shop page
pub async fn products() -> Html<String> {
    Html(views::products_page(&CATALOGUE))
}
