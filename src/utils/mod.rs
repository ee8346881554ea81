//! Cross-cutting utilities: atomic file I/O, platform detection, and spinners.

pub mod fs;
pub mod platform;
pub mod progress;

pub use fs::{atomic_write, ensure_dir, read_optional_text, write_json_file};
pub use platform::{docker_command, expand_tilde, get_home_dir, is_wsl};
pub use progress::{ProgressBar, spinner_with_message};
