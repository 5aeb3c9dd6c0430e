use axum::{
    http::HeaderValue,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers;
use crate::state::AppState;

/// Full router with permissive CORS
pub fn app(state: AppState) -> Router {
    router(state, CorsLayer::permissive())
}

/// Full router with the given CORS policy
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        // Public
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health))
        .merge(item_routes())
        .merge(user_routes())
        .merge(booking_routes())
        .merge(product_routes())
        .merge(review_routes())
        .merge(profile_routes())
        .merge(payment_routes())
        // Global middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy from configured origins; no origins means permissive
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::permissive().allow_origin(AllowOrigin::list(allowed))
    }
}

fn item_routes() -> Router<AppState> {
    use handlers::items;

    Router::new()
        .route("/item", get(items::list).post(items::create))
        .route(
            "/item/:id",
            get(items::get).put(items::update_quantity).delete(items::delete),
        )
}

fn user_routes() -> Router<AppState> {
    use handlers::users;

    Router::new()
        .route("/user", get(users::list))
        .route("/user/:email", put(users::upsert))
        .route("/user/admin/:email", put(users::make_admin))
        .route("/admin/:email", get(users::admin_status))
}

fn booking_routes() -> Router<AppState> {
    use handlers::bookings;

    Router::new()
        .route("/booking", get(bookings::list).post(bookings::create))
        .route("/booking/:id", get(bookings::get).patch(bookings::confirm_payment))
}

fn product_routes() -> Router<AppState> {
    use handlers::products;

    Router::new()
        .route("/product", get(products::list).post(products::create))
        .route("/product/:email", axum::routing::delete(products::delete))
}

fn review_routes() -> Router<AppState> {
    use handlers::reviews;

    Router::new().route("/myreview", get(reviews::list).post(reviews::create))
}

fn profile_routes() -> Router<AppState> {
    use handlers::profiles;

    Router::new()
        .route("/myprofile", get(profiles::list).post(profiles::create))
        .route("/myprofile/:id", put(profiles::update))
}

fn payment_routes() -> Router<AppState> {
    use handlers::payments;

    Router::new().route("/create-payment-intent", post(payments::create_intent))
}
