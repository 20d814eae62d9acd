mod client_options;
mod client_state;
mod protocol_version;
mod window;
