pub mod mvi;
pub mod search;
