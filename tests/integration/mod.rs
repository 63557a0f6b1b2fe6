mod config_surface;
mod daemon_flow;
