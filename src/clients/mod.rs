pub mod oidc;
pub mod sendgrid;
