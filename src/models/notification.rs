use serde::Serialize;

/// Insert payload for `notifications_push`.
///
/// `email` marks notifications that were also delivered by mail.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPushNotification {
    pub email: bool,
    pub category: String,
    pub new: bool,
    pub read: bool,
    pub user_id: Option<String>,
    pub related_id: String,
    pub notification_title: String,
    pub notification_text: String,
}

impl NewPushNotification {
    pub fn unread(
        user_id: Option<String>,
        related_id: &str,
        category: &str,
        title: &str,
        text: String,
    ) -> Self {
        Self {
            email: false,
            category: category.to_string(),
            new: true,
            read: false,
            user_id,
            related_id: related_id.to_string(),
            notification_title: title.to_string(),
            notification_text: text,
        }
    }

    pub fn mailed(mut self, email: bool) -> Self {
        self.email = email;
        self
    }
}
