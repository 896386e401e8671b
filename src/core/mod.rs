pub mod extract;
pub mod installer;
pub mod launcher;
pub mod target;
pub mod transport;

#[cfg(test)]
pub(crate) mod testutil;
