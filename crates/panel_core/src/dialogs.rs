use async_trait::async_trait;

/// Modal confirmation. Resolves to `true` when the administrator accepts.
#[async_trait]
pub trait Dialogs: Send + Sync {
    async fn confirm(&self, title: &str, message: &str) -> bool;
}

/// Answers every confirmation the same way without asking.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

#[async_trait]
impl Dialogs for AutoConfirm {
    async fn confirm(&self, title: &str, _message: &str) -> bool {
        tracing::debug!(title, accepted = self.0, "auto-answered confirmation");
        self.0
    }
}
