pub mod environment;
pub mod terminal;

pub use environment::{
    api_base_url, format_path_with_tilde, get_app_dir, log_dir_for, resolve_settings_path,
};
pub use terminal::sanitize_for_terminal;
