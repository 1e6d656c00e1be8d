//! Infrastructure: persistence

pub mod db;
