mod ord;
mod parse;

pub use ord::{compare_versions, rpmvercmp, vercmp};
pub use parse::Evr;
