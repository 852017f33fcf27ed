pub mod name_session;
