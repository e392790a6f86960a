//! Integration tests driving the feedsmith binary

mod helpers;
mod test_catalog;
mod test_publish;
mod test_version;
