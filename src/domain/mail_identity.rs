use super::EmailAddress;
use derive_getters::Getters;

/// Who outgoing emails are sent as, and where notifications are delivered.
#[derive(Debug, Clone, Getters)]
pub struct MailIdentity {
    display_name: String,
    sender: EmailAddress,
    admin: EmailAddress,
    site_name: String,
}

impl MailIdentity {
    pub fn new(
        display_name: impl Into<String>,
        sender: EmailAddress,
        admin: EmailAddress,
        site_name: impl Into<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            sender,
            admin,
            site_name: site_name.into(),
        }
    }

    /// The `From` header used for every outgoing email, e.g.
    /// `Jane Doe <jane@example.com>`.
    pub fn from_header(&self) -> String {
        format!("{} <{}>", self.display_name, self.sender)
    }
}
