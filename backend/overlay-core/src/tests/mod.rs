mod config;
mod connection;
mod event_log;
mod fakes;
mod router;
mod transition;
