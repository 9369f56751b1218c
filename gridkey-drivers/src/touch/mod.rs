//! Touch driver: CST328 handshake, acquisition and report decoding

pub mod cst328;

pub use cst328::{Cst328, Cst328Error};
