//! Push Token Handlers

pub(crate) mod register;
