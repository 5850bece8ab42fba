//! Route table - mirrors the storefront URL map plus the admin surface.

use crate::web::handlers::{accounts, admin, cart, catalog, checkout, orders};
use crate::web::state::AppState;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Builds the full application router.
pub fn build_router(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route("/products", get(admin::list_products).post(admin::create_product))
        .route("/products/:id", put(admin::update_product))
        .route("/categories", get(admin::list_categories).post(admin::create_category))
        .route("/categories/:id/active", post(admin::set_category_active))
        .route("/kashrut", get(admin::list_kashrut).post(admin::create_kashrut))
        .route("/marketers", get(admin::list_marketers).post(admin::create_marketer))
        .route("/events", get(admin::list_events).post(admin::create_event))
        .route("/orders", get(admin::list_orders))
        .route("/orders/:id/status", post(admin::set_order_status))
        .route("/orders/:id/payment-status", post(admin::set_payment_status))
        .route("/cart-items", get(admin::list_cart_items))
        .route("/users", get(admin::list_users))
        .route(
            "/users/:id",
            put(admin::update_user).delete(admin::delete_user),
        )
        .route("/users/:id/form", get(admin::user_form))
        .route("/profiles/:user_id", put(admin::update_profile));

    Router::new()
        .route("/", get(catalog::home))
        .route("/products", get(catalog::list_products))
        .route("/products/:id/:slug", get(catalog::product_detail))
        .route("/cart", get(cart::view_cart))
        .route("/cart/add", post(cart::add_to_cart))
        .route("/cart/update/:item_id", post(cart::update_quantity))
        .route("/cart/remove/:item_id", post(cart::remove_from_cart))
        .route("/checkout", get(checkout::checkout_form).post(checkout::place_order))
        .route(
            "/order-confirmation/:order_number",
            get(checkout::order_confirmation),
        )
        .route("/orders", get(orders::order_history))
        .route("/orders/:order_number", get(orders::order_detail))
        .route("/profile", get(accounts::my_profile).put(accounts::update_my_profile))
        .route("/accounts/register", post(accounts::register))
        .nest("/admin", admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
