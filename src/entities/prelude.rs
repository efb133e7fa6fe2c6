pub use super::achievements::Entity as Achievements;
pub use super::blog_posts::Entity as BlogPosts;
pub use super::certifications::Entity as Certifications;
pub use super::comments::Entity as Comments;
pub use super::contact_messages::Entity as ContactMessages;
pub use super::contests::Entity as Contests;
pub use super::education::Entity as Education;
pub use super::employment_experience::Entity as EmploymentExperience;
pub use super::faqs::Entity as Faqs;
pub use super::forum_posts::Entity as ForumPosts;
pub use super::forum_replies::Entity as ForumReplies;
pub use super::portfolio_sections::Entity as PortfolioSections;
pub use super::projects::Entity as Projects;
pub use super::skills::Entity as Skills;
pub use super::social_links::Entity as SocialLinks;
pub use super::users::Entity as Users;
