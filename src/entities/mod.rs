pub mod prelude;

pub mod achievements;
pub mod blog_posts;
pub mod certifications;
pub mod comments;
pub mod contact_messages;
pub mod contests;
pub mod education;
pub mod employment_experience;
pub mod faqs;
pub mod forum_posts;
pub mod forum_replies;
pub mod portfolio_sections;
pub mod projects;
pub mod skills;
pub mod social_links;
pub mod users;
