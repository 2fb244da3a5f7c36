use std::path::Path;

use axum::Router;
use tower_http::services::ServeFile;

use crate::state::AppState;

/// Fixed page routes, relative to the public directory.
pub const PAGES: &[(&str, &str)] = &[
    ("/", "index.html"),
    ("/registerPage", "pages/register.html"),
    ("/loginPage", "pages/login.html"),
    ("/success", "pages/success.html"),
    ("/error", "pages/error.html"),
    ("/resume", "resume.html"),
    ("/all-styles", "css/main.css"),
];

pub fn page_routes(public_dir: &Path) -> Router<AppState> {
    PAGES.iter().fold(Router::new(), |router, (path, file)| {
        router.route_service(path, ServeFile::new(public_dir.join(file)))
    })
}
