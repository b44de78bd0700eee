//! Keyword derivation, the template idea generator, and post rendering.

mod ideas;
mod keywords;
mod posts;

pub use ideas::TemplateIdeas;
pub use keywords::derive_keywords;
pub use posts::{generate_posts, render_post};
