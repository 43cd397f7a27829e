//! # GitHub API Endpoints
//!
//! Endpoint implementations grouped by resource: repository contents for the
//! lookup and write of each file, and app installations for the token
//! exchange.

pub mod contents;
pub mod installations;

#[cfg(test)]
mod tests {
  mod contents_test;
  mod installations_test;
}
