/// A fully composed email, ready to be handed to a mail transport.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    #[serde(rename = "html")]
    pub html_body: String,
}
