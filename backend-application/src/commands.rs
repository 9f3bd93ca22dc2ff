pub mod auth_commands;
