//! Clients for the external collaborators: Google OAuth/Drive/Sheets, the
//! Expo push API, and the mail API, plus the background sync dispatcher.

pub mod dispatcher;
pub mod drive;
pub mod keepalive;
pub mod mail;
pub mod oauth;
pub mod push;
pub mod sheets;
