pub mod controller;
pub mod filter;
pub mod histogram;
pub mod table;
