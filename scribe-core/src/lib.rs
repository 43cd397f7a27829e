//! # Scribe Core Library
//!
//! Shared data model for scribe: the two credential shapes, the file
//! descriptors a batch is made of, parsing and validation of the inbound
//! request document, and user settings. Nothing in this crate talks to the
//! network.

pub mod config;
pub mod consts;
pub mod credentials;
pub mod output;
pub mod repo;
pub mod request;

pub use config::{ConfigDirs, Settings, get_config_dirs};
pub use credentials::{AppCredential, Credentials, TokenCredential};
pub use output::{ColorMode, format_repo_path, print_error, print_info, print_success, print_warning};
pub use repo::{InvalidRepository, RepoSlug};
pub use request::{CommitRequest, FileDescriptor, GitHubAppInput, RequestError};
