pub mod analytics;
pub mod contact;
pub mod docs;
pub mod health;
