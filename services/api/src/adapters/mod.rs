pub mod db;

pub use db::DbStore;
