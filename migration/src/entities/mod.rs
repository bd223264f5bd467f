pub mod link;
pub mod link_click;
pub mod link_group;
pub mod profile;
pub mod social_link;
pub mod visit;

pub use link::Entity as LinkEntity;
pub use link_click::Entity as LinkClickEntity;
pub use link_group::Entity as LinkGroupEntity;
pub use profile::Entity as ProfileEntity;
pub use social_link::Entity as SocialLinkEntity;
pub use visit::Entity as VisitEntity;
