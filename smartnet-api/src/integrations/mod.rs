pub mod email_templates;
pub mod mailer;
