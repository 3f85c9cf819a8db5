//! Navigation seam between the checkout flow and the host shell.

/// Moves the shopper to another view.
pub trait Navigator: Send + Sync {
    /// Navigate to an application path such as `/products`.
    fn navigate_by_url(&self, path: &str);
}
