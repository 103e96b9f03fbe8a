pub mod errors;
pub mod db;
pub mod movie;
pub mod comment;
pub mod seed;

#[cfg(test)]
mod tests;
