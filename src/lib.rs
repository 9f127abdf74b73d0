// NeuroScan: novelty detection against a reference embedding corpus
//
// This is the library root. Each module corresponds to one stage of the
// analysis flow: text -> embedding -> scoring against the reference set ->
// history, orchestrated by the pipeline and exposed over HTTP by web.

pub mod config;
pub mod embedding;
pub mod history;
pub mod output;
pub mod pipeline;
pub mod reference;
pub mod scoring;
pub mod status;
pub mod text;

#[cfg(feature = "web")]
pub mod web;
