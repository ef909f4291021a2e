pub mod index;
pub mod page;
pub mod sitemap;
pub mod template;

pub use index::{AssembledIndex, Fragment, IndexAssembler};
pub use page::CardPageRenderer;
pub use sitemap::{Sitemap, SitemapBuilder, SitemapReport};
pub use template::Templates;
