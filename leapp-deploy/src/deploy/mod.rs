pub mod layout;
pub mod options;

mod core;
pub use core::{Deployer, InstallReport, InstallStatus, InstalledFile, StoreStatus};
