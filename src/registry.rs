//! Route registration for the bundled sample API.

use crate::controllers::{auth, misc, products, sessions, users};
use crate::errors::RegistrationError;
use crate::router::RouteTable;
use http::Method;

/// Mount every sample endpoint on `table`.
///
/// # Errors
///
/// Propagates the first [`RegistrationError`], e.g. when `table` already holds one
/// of these routes.
pub fn register_sample_api(table: &mut RouteTable) -> Result<(), RegistrationError> {
    table
        .register(Method::GET, "/", misc::root)?
        .register(Method::GET, "/health", misc::health)?
        .register(Method::GET, "/search", misc::search)?
        .register(Method::POST, "/auth/login", auth::login)?;

    table.group("/users", |g| {
        g.register(Method::GET, "/", users::list)?
            .register(Method::POST, "/", users::create)?
            .register(Method::GET, "/{id}", users::get)?
            .register(Method::PUT, "/{id}", users::update)?
            .register(Method::DELETE, "/{id}", users::delete)?
            .register(Method::GET, "/{userId}/posts", users::list_posts)?;
        Ok(())
    })?;

    table.group("/products", |g| {
        g.register(Method::GET, "/", products::list)?
            .register(Method::POST, "/", products::create)?
            .register(Method::GET, "/{id}", products::get)?
            .register(Method::PUT, "/{id}", products::update)?
            .register(Method::DELETE, "/{id}", products::delete)?
            .register(Method::GET, "/{productId}/reviews", products::list_reviews)?;
        Ok(())
    })?;

    table
        .register(Method::PUT, "/settings/{userId}", sessions::update_settings)?
        .register(Method::DELETE, "/sessions/{sessionId}", sessions::delete_session)?;

    Ok(())
}

/// A fresh table holding the sample API.
///
/// # Errors
///
/// Same as [`register_sample_api`].
pub fn sample_table() -> Result<RouteTable, RegistrationError> {
    let mut table = RouteTable::new();
    register_sample_api(&mut table)?;
    Ok(table)
}
