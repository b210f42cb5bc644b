//! Page components for the application.
//!
//! Each page is a Leptos component that renders a specific route. Pages do
//! not check access themselves; the route guards in `crate::guard` do.

pub mod home;
pub mod login;
pub mod screen;

// Re-export all page components for convenient access
pub use home::HomePage;
pub use login::LoginPage;
pub use screen::Screen;
