//! Controller layer: one controller per panel screen. Each reads its view
//! fields, issues at most one REST call per action and writes the outcome
//! back into view fields.

pub mod client_edit;
pub mod client_list;
pub mod login;
pub mod main;
pub mod offline;
