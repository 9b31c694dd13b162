mod composer;
mod popularity;

pub use composer::compose_rows;
pub use popularity::annotate_popularity;
