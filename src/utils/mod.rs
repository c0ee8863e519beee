pub mod excerpt;
pub mod terms;
pub mod url_normalizer;
