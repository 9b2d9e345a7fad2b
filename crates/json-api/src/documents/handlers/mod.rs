//! Document Handlers

pub(crate) mod list_ines;
pub(crate) mod register_ine;
pub(crate) mod register_worker;
