/// The user-facing side of a session: toasts and route changes.
pub trait Navigator: Send + Sync {
    fn notify(&self, message: &str);
    fn redirect(&self, route: &str);
}
