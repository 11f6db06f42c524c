/// Port for the bootstrap logger used while installing.
///
/// Reconciliation failures end up here instead of aborting the install.
pub trait Logger {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
}
