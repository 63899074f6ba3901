pub mod education;
pub mod experience;
pub mod item;
pub mod skill;
pub mod tag;
pub mod user;

pub use education::{Education, EducationUpdate};
pub use experience::{Experience, ExperienceUpdate};
pub use item::{Item, ItemUpdate};
pub use skill::{Skill, SkillOpen, SkillUpdate};
pub use tag::{Tag, TagUpdate};
pub use user::{User, UserPublic};
