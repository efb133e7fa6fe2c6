pub mod auth_service;
pub mod auth_service_impl;
pub use auth_service::{AuthError, AuthService, AuthSession, SignUp};
pub use auth_service_impl::SeaOrmAuthService;

pub mod tokens;
pub use tokens::TokenService;

pub mod mailer;
pub use mailer::{LogMailer, Mailer, OutgoingEmail, SendGridMailer, mailer_from_config};

pub mod email_templates;

pub mod notifications;
pub use notifications::NotificationService;

pub mod scheduler;
pub use scheduler::Scheduler;
