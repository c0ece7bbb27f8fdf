pub mod artifact;
pub mod enrichment;
pub mod providers;
pub mod recommendations;
pub mod title_search;
pub mod trending;

pub use artifact::{ArtifactStore, LoadedArtifact};
pub use enrichment::ImageUrls;
pub use providers::{DisabledProvider, MetadataProvider, TmdbProvider};
