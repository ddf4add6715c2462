mod sample_catalog;
mod sample_data;

pub use sample_catalog::SampleCatalog;
pub use sample_data::sample_videos;
