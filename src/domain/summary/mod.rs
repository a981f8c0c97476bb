//! Summary artifact: ranked top-5 document plus its SVG rendering.

pub mod artifact;
pub mod svg;

pub use artifact::{format_gdp, rank_by_gdp, RankedCountry, SummaryArtifact, TOP_N};
pub use svg::render_svg;
