pub mod tarjan;
pub mod vf2;
pub mod weisfeiler_leman;

pub use tarjan::{TarjanInput, TarjanOutput, TarjanScc};
pub use vf2::{PatternGraph, Vf2Input, Vf2Isomorphism, Vf2Output};
pub use weisfeiler_leman::{WeisfeilerLeman, WeisfeilerLemanInput, WeisfeilerLemanOutput};
