pub mod container_test;
pub mod deps;
pub mod install;
pub mod status;

/// `0640` style rendering of permission bits.
pub(crate) fn octal(mode: u32) -> String {
    format!("{mode:04o}")
}
