use std::sync::Arc;

use chatdash_core::Page;

/// Render target for a list controller.
///
/// Both hooks run while the controller's state lock is held, so they must
/// not call back into the controller.
pub trait PageRenderer<T>: Send + Sync {
    /// Show a freshly loaded page. `page.no_results()` marks an empty result set.
    fn render(&self, page: &Page<T>);

    /// Report a failed load. Whatever was rendered last stays on screen.
    fn show_error(&self, error: &(dyn std::error::Error + 'static));
}

impl<T, R: PageRenderer<T> + ?Sized> PageRenderer<T> for Arc<R> {
    fn render(&self, page: &Page<T>) {
        (**self).render(page);
    }

    fn show_error(&self, error: &(dyn std::error::Error + 'static)) {
        (**self).show_error(error);
    }
}
