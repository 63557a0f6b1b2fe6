pub mod commands;
pub mod daemon;
pub mod monitor;
pub mod notify;
pub mod printer;
pub mod reaction;
pub mod sensor;
pub mod settings;
