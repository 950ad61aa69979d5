//! Candidate rescoring from paragraph mixtures

mod mixture_rescorer;

pub use mixture_rescorer::MixtureRescorer;
